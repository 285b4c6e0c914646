use mascot_types::{AssetId, DecodedAsset};

use crate::error::ThemeError;

/// Receiver of presentation callbacks, implemented by the UI layer.
///
/// All callbacks are invoked from [`PresentationController::update`] or the
/// controller's input methods, never from the loader thread.
///
/// [`PresentationController::update`]: crate::controller::PresentationController::update
pub trait PresentationListener {
    fn on_progress(&mut self, done: usize, total: usize, label: &str);

    fn on_theme_ready(&mut self, theme_id: &str);

    fn on_theme_failed(&mut self, theme_id: &str, error: &ThemeError);

    /// `asset` is the cached image for `id`.
    fn on_display_asset(&mut self, id: &AssetId, asset: &DecodedAsset);

    fn on_play_sound(&mut self, _id: &AssetId) {}
}
