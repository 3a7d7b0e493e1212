use papershelf_core::{
    CatalogError, FetchRequest, PaperRecord, RequestTicket, UploadReceipt, UploadSubmission,
};

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Execute an issued catalog read.
    Fetch(FetchRequest),
    /// Send a validated upload.
    Upload(UploadSubmission),
}

/// Events flowing from the backend task to the TUI.
#[derive(Debug)]
pub enum BackendEvent {
    FetchComplete {
        ticket: RequestTicket,
        outcome: Result<Vec<PaperRecord>, CatalogError>,
    },
    UploadComplete {
        submission: UploadSubmission,
        outcome: Result<UploadReceipt, CatalogError>,
    },
}
