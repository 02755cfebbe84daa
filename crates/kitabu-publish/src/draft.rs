//! Book-creation form model
//!
//! Mirrors the author's form: title, description, an optional cover and a
//! growing list of pages, each with text and an optional illustration.

use std::path::{Path, PathBuf};

use kitabu::{Book, Page};
use serde::Deserialize;

use crate::error::PublishError;

/// File picked in the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// Name sent as the multipart filename.
    pub file_name: String,
    /// MIME type sent with the part.
    pub mime: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Wrap in-memory bytes.
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file, guessing its image MIME type from the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PublishError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = image_mime(path);
        Ok(Self::new(file_name, mime, bytes))
    }
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// One page of the draft.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageDraft {
    /// Page text.
    pub text: String,
    /// Optional illustration.
    pub image: Option<Attachment>,
}

#[derive(Deserialize)]
struct DraftFile {
    title: String,
    description: String,
    #[serde(default)]
    cover: Option<PathBuf>,
    #[serde(default)]
    pages: Vec<PageFile>,
}

#[derive(Deserialize)]
struct PageFile {
    text: String,
    #[serde(default)]
    image: Option<PathBuf>,
}

/// Value of a multipart field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Plain text field.
    Text(&'a str),
    /// File field.
    File(&'a Attachment),
}

/// Book being written by an author.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookDraft {
    /// Title (required).
    pub title: String,
    /// Description (required).
    pub description: String,
    /// Optional cover image.
    pub cover: Option<Attachment>,
    /// Pages in order.
    pub pages: Vec<PageDraft>,
}

impl BookDraft {
    /// Empty draft.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Decode a draft file; image paths are resolved against `base`.
    ///
    /// ```text
    /// {"title": "...", "description": "...", "cover": "cover.png",
    ///  "pages": [{"text": "...", "image": "p1.png"}]}
    /// ```
    pub fn from_draft_json(json: &str, base: &Path) -> Result<Self, PublishError> {
        let file: DraftFile =
            serde_json::from_str(json).map_err(|err| PublishError::Malformed(err.to_string()))?;

        let mut draft = Self::new(file.title, file.description);
        if let Some(cover) = file.cover {
            draft.cover = Some(Attachment::from_path(base.join(cover))?);
        }
        for page in file.pages {
            let index = draft.add_page();
            draft.set_page_text(index, page.text);
            if let Some(image) = page.image {
                draft.set_page_image(index, Some(Attachment::from_path(base.join(image))?));
            }
        }
        Ok(draft)
    }

    /// Read a draft file from disk.
    pub fn from_draft_path<P: AsRef<Path>>(path: P) -> Result<Self, PublishError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_draft_json(&json, base)
    }

    /// Append an empty page and return its index.
    pub fn add_page(&mut self) -> usize {
        self.pages.push(PageDraft::default());
        self.pages.len() - 1
    }

    /// Set the text of page `index`. Returns false when there is no such page.
    pub fn set_page_text(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.pages.get_mut(index) {
            Some(page) => {
                page.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Set or clear the illustration of page `index`.
    pub fn set_page_image(&mut self, index: usize, image: Option<Attachment>) -> bool {
        match self.pages.get_mut(index) {
            Some(page) => {
                page.image = image;
                true
            }
            None => false,
        }
    }

    /// Check required fields before anything is sent.
    ///
    /// The server stops reading pages at the first blank text, so a blank
    /// page would silently truncate the book; it is refused here instead.
    pub fn validate(&self) -> Result<(), PublishError> {
        if self.title.trim().is_empty() {
            return Err(PublishError::Invalid {
                field: "title".into(),
            });
        }
        if self.description.trim().is_empty() {
            return Err(PublishError::Invalid {
                field: "description".into(),
            });
        }
        if let Some(index) = self.pages.iter().position(|p| p.text.trim().is_empty()) {
            return Err(PublishError::Invalid {
                field: format!("text of page {}", index + 1),
            });
        }
        Ok(())
    }

    /// Multipart fields in the order the server reads them.
    pub fn form_fields(&self) -> Vec<(String, FieldValue<'_>)> {
        let mut fields = vec![
            ("title".to_string(), FieldValue::Text(&self.title)),
            ("description".to_string(), FieldValue::Text(&self.description)),
        ];
        if let Some(cover) = &self.cover {
            fields.push(("coverImage".to_string(), FieldValue::File(cover)));
        }
        for (index, page) in self.pages.iter().enumerate() {
            fields.push((format!("pages[{}][text]", index), FieldValue::Text(&page.text)));
            if let Some(image) = &page.image {
                fields.push((format!("pages[{}][image]", index), FieldValue::File(image)));
            }
        }
        fields
    }

    /// Build the multipart body.
    pub fn to_multipart(&self) -> Result<reqwest::blocking::multipart::Form, PublishError> {
        use reqwest::blocking::multipart::{Form, Part};

        let mut form = Form::new();
        for (name, value) in self.form_fields() {
            form = match value {
                FieldValue::Text(text) => form.text(name, text.to_string()),
                FieldValue::File(file) => {
                    let part = Part::bytes(file.bytes.clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.mime)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }

    /// Local preview as a readable book; images are shown by file name.
    pub fn preview(&self) -> Book {
        Book {
            id: 0,
            title: self.title.clone(),
            author: String::new(),
            level: Default::default(),
            category: None,
            age_group: None,
            description: self.description.clone(),
            pages: self
                .pages
                .iter()
                .map(|page| {
                    let image = page
                        .image
                        .as_ref()
                        .map(|a| a.file_name.clone())
                        .unwrap_or_default();
                    Page::new(image, page.text.clone(), "")
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> Attachment {
        Attachment::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    fn draft() -> BookDraft {
        let mut draft = BookDraft::new("Tembo Mdogo", "Tembo mdogo anajifunza kuogelea.");
        draft.cover = Some(png("cover.png"));
        let first = draft.add_page();
        draft.set_page_text(first, "Tembo mdogo aliogopa maji.");
        draft.set_page_image(first, Some(png("p1.png")));
        let second = draft.add_page();
        draft.set_page_text(second, "Mama yake alimfundisha kuogelea.");
        draft
    }

    #[test]
    fn test_form_field_names() {
        let draft = draft();
        let names: Vec<_> = draft
            .form_fields()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            [
                "title",
                "description",
                "coverImage",
                "pages[0][text]",
                "pages[0][image]",
                "pages[1][text]",
            ]
        );
    }

    #[test]
    fn test_form_fields_without_attachments() {
        let mut draft = BookDraft::new("Kichwa", "Maelezo");
        draft.add_page();
        draft.set_page_text(0, "Ukurasa wa kwanza");
        let fields = draft.form_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[2].1, FieldValue::Text("Ukurasa wa kwanza"));
    }

    #[test]
    fn test_validate_required_fields() {
        assert!(draft().validate().is_ok());

        let mut untitled = draft();
        untitled.title = "  ".into();
        assert_eq!(
            untitled.validate(),
            Err(PublishError::Invalid {
                field: "title".into()
            })
        );

        let mut blank_page = draft();
        blank_page.add_page();
        assert_eq!(
            blank_page.validate(),
            Err(PublishError::Invalid {
                field: "text of page 3".into()
            })
        );
    }

    #[test]
    fn test_setters_reject_missing_page() {
        let mut draft = BookDraft::new("a", "b");
        assert!(!draft.set_page_text(0, "x"));
        assert!(!draft.set_page_image(0, None));
    }

    #[test]
    fn test_preview_is_readable() {
        let book = draft().preview();
        assert_eq!(book.page_count(), 2);
        assert_eq!(book.pages[0].image, "p1.png");
        assert!(book.ensure_readable().is_ok());
    }

    #[test]
    fn test_image_mime_guess() {
        assert_eq!(image_mime(Path::new("a/B.JPG")), "image/jpeg");
        assert_eq!(image_mime(Path::new("cover.webp")), "image/webp");
        assert_eq!(image_mime(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_draft_json_without_images() {
        let json = r#"{"title": "Kichwa", "description": "Maelezo",
            "pages": [{"text": "Ukurasa wa kwanza"}, {"text": "Ukurasa wa pili"}]}"#;
        let draft = BookDraft::from_draft_json(json, Path::new("drafts")).unwrap();
        assert_eq!(draft.title, "Kichwa");
        assert_eq!(draft.pages.len(), 2);
        assert_eq!(draft.pages[1].text, "Ukurasa wa pili");
        assert!(draft.cover.is_none());
    }

    #[test]
    fn test_malformed_draft_json_is_not_io() {
        let err = BookDraft::from_draft_json(r#"{"title": "Kichwa""#, Path::new(".")).unwrap_err();
        assert!(matches!(err, PublishError::Malformed(_)));
        assert!(err.user_message().starts_with("Error: invalid draft file"));

        let err = BookDraft::from_draft_json(r#"{"title": "Kichwa"}"#, Path::new(".")).unwrap_err();
        assert!(matches!(err, PublishError::Malformed(_)));
    }

    #[test]
    fn test_missing_image_is_io() {
        let json = r#"{"title": "a", "description": "b", "cover": "no-such-cover.png"}"#;
        let err = BookDraft::from_draft_json(json, Path::new("/nonexistent-kitabu-dir")).unwrap_err();
        assert!(matches!(err, PublishError::Io(_)));
    }
}
