use crate::client::LinkService;
use crate::errors::{ErrorKind, ServiceError};
use crate::models::{CreateLinkRequest, FormSnapshot, Link};

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("a long URL is required")]
    MissingLongUrl,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl FormError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingLongUrl => ErrorKind::Validation,
            Self::Service(err) => err.kind(),
        }
    }

    /// True when the service accepted the request but its reply could not
    /// be read, so the link may exist anyway.
    pub fn may_have_landed(&self) -> bool {
        matches!(self, Self::Service(ServiceError::Decode(_)))
    }
}

/// Draft of a link that has not been submitted yet.
///
/// Fields survive a failed submission so the user can correct them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreationForm {
    pub long_url: String,
    pub custom_short_code: String,
}

impl CreationForm {
    pub fn set(&mut self, long_url: impl Into<String>, custom_short_code: impl Into<String>) {
        self.long_url = long_url.into();
        self.custom_short_code = custom_short_code.into();
    }

    pub fn clear(&mut self) {
        self.long_url.clear();
        self.custom_short_code.clear();
    }

    /// Builds the outgoing payload. A blank custom code means "let the
    /// service pick one", never an empty alias.
    pub fn payload(&self) -> Result<CreateLinkRequest, FormError> {
        if self.long_url.trim().is_empty() {
            return Err(FormError::MissingLongUrl);
        }
        let custom_short_code = match self.custom_short_code.trim() {
            "" => None,
            _ => Some(self.custom_short_code.clone()),
        };
        Ok(CreateLinkRequest {
            long_url: self.long_url.clone(),
            custom_short_code,
        })
    }

    pub async fn submit(&mut self, service: &dyn LinkService) -> Result<Link, FormError> {
        let payload = self.payload()?;
        let link = service.create_link(payload).await?;
        self.clear();
        Ok(link)
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            long_url: self.long_url.clone(),
            custom_short_code: self.custom_short_code.clone(),
        }
    }
}
