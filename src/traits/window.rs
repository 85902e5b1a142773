use std::fmt;

use crate::core::dib::{Blit, DibDescriptor};
use crate::error::Result;
use crate::types::Extent2D;

/// Native window binding - everything the presenter needs from the windowing system.
///
/// Resources handed out by the binding release themselves on drop, so a
/// presentation buffer never has to call back into the window to tear down.
pub trait NativeWindow {
    /// Application instance the window belongs to
    type Instance: fmt::Debug;

    /// Destination pixels are painted onto; dropping it returns it to the window
    type DrawContext;

    /// Native bitmap header built from a [`DibDescriptor`]; dropping it frees it
    type Header;

    /// Current client-area size in pixels
    fn client_extent(&self) -> Result<Extent2D>;

    /// Acquire a draw context for the window
    fn acquire_draw_context(&self) -> Result<Self::DrawContext>;

    /// Encode the descriptor into the platform's header layout
    fn create_header(&self, descriptor: &DibDescriptor) -> Result<Self::Header>;

    /// Stretch `blit.pixels` into the draw context. Synchronous.
    fn stretch_blit(
        &self,
        context: &mut Self::DrawContext,
        header: &Self::Header,
        blit: &Blit<'_>,
    ) -> Result<()>;
}
