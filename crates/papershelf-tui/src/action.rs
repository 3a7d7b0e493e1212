/// User-level actions produced by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Tick,
    Resize(u16, u16),

    // Navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    NextTab,
    PrevTab,
    SelectTab(usize),
    DrillIn,
    NavigateBack,
    ToggleHelp,

    // Browse
    StartSearch,
    StartFilter,
    CycleSortField,
    ToggleSortOrder,
    ClearFilters,
    Reload,

    // Upload
    Submit,
    CycleTheme,

    // Line editing
    EditInput(char),
    EditBackspace,
    EditDelete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    EditConfirm,
    EditCancel,
    NextField,
    PrevField,

    None,
}
