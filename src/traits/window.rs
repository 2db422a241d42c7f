/// Host window the sketch draws into
pub trait WindowContext {
    /// Schedule another frame callback
    fn request_redraw(&self);

    /// Get the inner size of the window in physical pixels
    fn inner_size(&self) -> (u32, u32);

    /// Physical pixels per logical pixel
    fn scale_factor(&self) -> f64;
}
