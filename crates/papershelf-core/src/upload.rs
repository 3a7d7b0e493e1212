//! Upload draft, local validation and user-facing outcome messages.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::catalog::CatalogError;

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Upload successful!";
pub const MISSING_FILE_MESSAGE: &str = "Please upload a file";

/// The six required text fields of an upload, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Authors,
    Department,
    PublicationDate,
    Journal,
    Keywords,
}

impl DraftField {
    pub fn all() -> &'static [DraftField] {
        &[
            Self::Title,
            Self::Authors,
            Self::Department,
            Self::PublicationDate,
            Self::Journal,
            Self::Keywords,
        ]
    }

    /// Multipart part name.
    pub fn form_name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Authors => "authors",
            Self::Department => "department",
            Self::PublicationDate => "publication_date",
            Self::Journal => "journal",
            Self::Keywords => "keywords",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Authors => "Authors",
            Self::Department => "Department",
            Self::PublicationDate => "Publication Date",
            Self::Journal => "Journal",
            Self::Keywords => "Keywords",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Title => "Enter title...",
            Self::Authors => "Enter authors...",
            Self::Department => "Enter department...",
            Self::PublicationDate => "YYYY-MM-DD",
            Self::Journal => "Enter journal...",
            Self::Keywords => "machine learning, AI, neural networks...",
        }
    }
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("no file selected")]
    MissingFile,
    #[error("{} is not a PDF", .0.display())]
    NotPdf(PathBuf),
    #[error("{} is required", .0.label())]
    MissingField(DraftField),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl UploadError {
    /// True if the failure was detected locally, before any network call.
    pub fn is_local(&self) -> bool {
        !matches!(self, UploadError::Catalog(_))
    }

    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::MissingFile => MISSING_FILE_MESSAGE.to_string(),
            UploadError::NotPdf(path) => format!(
                "Please choose a PDF file ({} is not one)",
                file_name_of(path)
            ),
            UploadError::MissingField(field) => format!("Please fill in {}", field.label()),
            UploadError::Catalog(err) if err.is_application() => format!(
                "Upload failed: {}",
                err.detail().unwrap_or("Unknown error")
            ),
            UploadError::Catalog(err) => format!("Error: {err}"),
        }
    }
}

/// Upload form contents, edited field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDraft {
    pub title: String,
    pub authors: String,
    pub department: String,
    pub publication_date: String,
    pub journal: String,
    pub keywords: String,
    pub file: Option<PathBuf>,
}

impl UploadDraft {
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Authors => &self.authors,
            DraftField::Department => &self.department,
            DraftField::PublicationDate => &self.publication_date,
            DraftField::Journal => &self.journal,
            DraftField::Keywords => &self.keywords,
        }
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::Title => &mut self.title,
            DraftField::Authors => &mut self.authors,
            DraftField::Department => &mut self.department,
            DraftField::PublicationDate => &mut self.publication_date,
            DraftField::Journal => &mut self.journal,
            DraftField::Keywords => &mut self.keywords,
        };
        *slot = value.into();
    }

    pub fn set_file(&mut self, path: impl Into<PathBuf>) {
        self.file = Some(path.into());
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate the draft and package it for submission. The file check
    /// runs first so a missing file is always what the user hears about.
    pub fn to_submission(&self) -> Result<UploadSubmission, UploadError> {
        let file = self.file.clone().ok_or(UploadError::MissingFile)?;
        let is_pdf = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if !is_pdf {
            return Err(UploadError::NotPdf(file));
        }
        if let Some(missing) = DraftField::all()
            .iter()
            .find(|f| self.field(**f).trim().is_empty())
        {
            return Err(UploadError::MissingField(*missing));
        }

        Ok(UploadSubmission {
            title: self.title.clone(),
            authors: self.authors.clone(),
            department: self.department.clone(),
            publication_date: self.publication_date.clone(),
            journal: self.journal.clone(),
            keywords: self.keywords.clone(),
            file,
        })
    }
}

/// A validated draft, ready to be sent as one multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSubmission {
    pub title: String,
    pub authors: String,
    pub department: String,
    pub publication_date: String,
    pub journal: String,
    pub keywords: String,
    pub file: PathBuf,
}

impl UploadSubmission {
    /// Text parts in form order.
    pub fn fields(&self) -> Vec<(DraftField, &str)> {
        vec![
            (DraftField::Title, self.title.as_str()),
            (DraftField::Authors, self.authors.as_str()),
            (DraftField::Department, self.department.as_str()),
            (DraftField::PublicationDate, self.publication_date.as_str()),
            (DraftField::Journal, self.journal.as_str()),
            (DraftField::Keywords, self.keywords.as_str()),
        ]
    }

    pub fn file_name(&self) -> String {
        file_name_of(&self.file)
    }
}

/// What the catalog returned for an accepted upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReceipt {
    pub message: Option<String>,
    pub file_url: Option<String>,
}

/// An upload accepted during this session, listed under "My Papers".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPaper {
    pub title: String,
    pub authors: String,
    pub file_name: String,
    pub file_url: Option<String>,
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
