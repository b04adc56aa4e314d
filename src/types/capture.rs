use serde::{Deserialize, Serialize};

/// The most recent capture: an annotated-or-raw screenshot and the page it came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapturedPage {
    /// `data:image/png;base64,...`
    pub screenshot_data_url: Option<String>,
    pub page_url: Option<String>,
}
