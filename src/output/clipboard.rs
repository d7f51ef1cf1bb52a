use crate::error::{Result, RiskMatrixError};

/// Put `text` on the system clipboard.
///
/// Headless sessions have no clipboard; callers treat failure as a warning.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| RiskMatrixError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| RiskMatrixError::Clipboard(e.to_string()))?;
    log::info!("copied {} bytes to the clipboard", text.len());
    Ok(())
}
