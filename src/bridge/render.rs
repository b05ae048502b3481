//! Renderable log sources
//!
//! A source must produce identical output every time it is rendered: the
//! bridge renders once to measure and once into the message buffer.

use crate::printf::{Printf, RenderError};
use std::fmt;

/// Something the bridge can turn into message text
pub trait Render {
    fn render(&self, out: &mut dyn fmt::Write) -> Result<(), RenderError>;
}

impl Render for str {
    fn render(&self, out: &mut dyn fmt::Write) -> Result<(), RenderError> {
        out.write_str(self)?;
        Ok(())
    }
}

impl Render for String {
    fn render(&self, out: &mut dyn fmt::Write) -> Result<(), RenderError> {
        self.as_str().render(out)
    }
}

impl Render for fmt::Arguments<'_> {
    fn render(&self, out: &mut dyn fmt::Write) -> Result<(), RenderError> {
        fmt::write(out, *self)?;
        Ok(())
    }
}

impl Render for Printf<'_, '_> {
    fn render(&self, out: &mut dyn fmt::Write) -> Result<(), RenderError> {
        self.render_to(out)
    }
}

impl<R: Render + ?Sized> Render for &R {
    fn render(&self, out: &mut dyn fmt::Write) -> Result<(), RenderError> {
        (**self).render(out)
    }
}
