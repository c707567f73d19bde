use crate::error::Error;
use crate::model::SourceBitmap;

/// Destination for placed bitmaps.
///
/// A sink starts with page 0 open. Calls arrive in page order and, within a
/// page, top to bottom; an earlier page is never revisited. Coordinates are
/// page units measured from the page's top-left corner.
pub trait PageSink {
    fn new_page(&mut self) -> Result<(), Error>;

    fn place(
        &mut self,
        bitmap: &SourceBitmap,
        dest_x: f32,
        dest_y: f32,
        dest_width: f32,
        dest_height: f32,
    ) -> Result<(), Error>;
}
