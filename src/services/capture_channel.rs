//! Capture Channel for gitlab-reporter.
//!
//! One task owns the latest capture. The popup/background surface stores a
//! capture through a [`CaptureHandle`]; the content surface asks for the
//! screenshot and page URL through its own clone of the handle.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::debug;
use tokio::sync::{mpsc, oneshot};

use crate::types::capture::CapturedPage;
use crate::types::errors::CaptureError;

const CHANNEL_CAPACITY: usize = 16;

/// Requests understood by the capture owner task.
#[derive(Debug)]
pub enum CaptureRequest {
    Store {
        page: CapturedPage,
        reply: oneshot::Sender<()>,
    },
    GetScreenshot {
        reply: oneshot::Sender<Option<String>>,
    },
    GetUrl {
        reply: oneshot::Sender<Option<String>>,
    },
}

/// Cloneable sender side of the channel.
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    tx: mpsc::Sender<CaptureRequest>,
}

/// Spawns the owner task on the current tokio runtime and returns its handle.
///
/// The task stops once every handle has been dropped.
pub fn spawn() -> CaptureHandle {
    let (tx, mut rx) = mpsc::channel::<CaptureRequest>(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut current = CapturedPage::default();
        while let Some(request) = rx.recv().await {
            match request {
                CaptureRequest::Store { page, reply } => {
                    debug!("Stored capture for {:?}", page.page_url);
                    current = page;
                    let _ = reply.send(());
                }
                CaptureRequest::GetScreenshot { reply } => {
                    let _ = reply.send(current.screenshot_data_url.clone());
                }
                CaptureRequest::GetUrl { reply } => {
                    let _ = reply.send(current.page_url.clone());
                }
            }
        }
        debug!("Capture channel owner stopped");
    });

    CaptureHandle { tx }
}

impl CaptureHandle {
    /// Replaces the current capture.
    pub async fn store(&self, page: CapturedPage) -> Result<(), CaptureError> {
        let (reply, rx) = oneshot::channel();
        self.send(CaptureRequest::Store { page, reply }).await?;
        rx.await.map_err(|_| CaptureError::ChannelClosed)
    }

    pub async fn screenshot(&self) -> Result<Option<String>, CaptureError> {
        let (reply, rx) = oneshot::channel();
        self.send(CaptureRequest::GetScreenshot { reply }).await?;
        rx.await.map_err(|_| CaptureError::ChannelClosed)
    }

    pub async fn page_url(&self) -> Result<Option<String>, CaptureError> {
        let (reply, rx) = oneshot::channel();
        self.send(CaptureRequest::GetUrl { reply }).await?;
        rx.await.map_err(|_| CaptureError::ChannelClosed)
    }

    async fn send(&self, request: CaptureRequest) -> Result<(), CaptureError> {
        self.tx
            .send(request)
            .await
            .map_err(|_| CaptureError::ChannelClosed)
    }
}

/// Decodes a `data:<mime>;base64,<payload>` URL into raw bytes.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, CaptureError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| CaptureError::InvalidDataUrl("missing 'data:' prefix".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| CaptureError::InvalidDataUrl("missing ',' separator".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(CaptureError::InvalidDataUrl(
            "only base64 payloads are supported".to_string(),
        ));
    }
    BASE64
        .decode(payload.trim())
        .map_err(|e| CaptureError::InvalidDataUrl(format!("base64 decode error: {}", e)))
}

/// Encodes PNG bytes as a `data:image/png;base64,` URL.
pub fn encode_png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}
