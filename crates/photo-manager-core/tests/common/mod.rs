pub mod test_images;
pub use test_images::*;

use std::cell::RefCell;

use photo_manager_core::{Error, Result, UploadItem, UploadRole, UploadedFile, Uploader};

/// Uploader double that records each call and answers with CDN-style URLs
#[derive(Default)]
pub struct FakeUploader {
    pub calls: RefCell<Vec<Vec<UploadItem>>>,
    pub fail_with: Option<String>,
    pub skip_thumbnail: bool,
}

impl FakeUploader {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Uploader for FakeUploader {
    fn upload(&self, items: &[UploadItem]) -> Result<Vec<UploadedFile>> {
        self.calls.borrow_mut().push(items.to_vec());

        if let Some(message) = &self.fail_with {
            return Err(Error::Upload(message.clone()));
        }

        Ok(items
            .iter()
            .filter(|item| !(self.skip_thumbnail && item.role == UploadRole::Thumbnail))
            .map(|item| UploadedFile {
                path: item.path.clone(),
                url: cdn_url(&item.path),
                role: item.role,
            })
            .collect())
    }
}

pub fn cdn_url(path: &std::path::Path) -> String {
    format!(
        "https://cdn.example.com/photos/{}",
        path.file_name().unwrap().to_string_lossy()
    )
}
