/// Top-level view of the client. Any view is reachable from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Browse,
    Upload,
    Manage,
}

impl View {
    pub fn all() -> &'static [View] {
        &[Self::Browse, Self::Upload, Self::Manage]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Browse => "Browse Papers",
            Self::Upload => "Upload Paper",
            Self::Manage => "My Papers",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Browse => 0,
            Self::Upload => 1,
            Self::Manage => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<View> {
        Self::all().get(i).copied()
    }

    pub fn next(self) -> Self {
        Self::all()[(self.index() + 1) % Self::all().len()]
    }

    pub fn prev(self) -> Self {
        let n = Self::all().len();
        Self::all()[(self.index() + n - 1) % n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_wraps() {
        assert_eq!(View::Manage.next(), View::Browse);
        assert_eq!(View::Browse.prev(), View::Manage);
        assert_eq!(View::from_index(1), Some(View::Upload));
        assert_eq!(View::from_index(3), None);
    }
}
