//! Handle returned by a successful load.

use widgets_core::Widget;

/// Owns a freshly loaded widget and exposes only what callers need: access to
/// the instance and render attachment.
#[derive(Debug)]
pub struct WidgetHandle<E: ?Sized> {
    widget: Widget<E>,
}

impl<E: ?Sized> WidgetHandle<E> {
    pub(crate) const fn new(widget: Widget<E>) -> Self {
        Self { widget }
    }

    #[must_use]
    pub const fn instance(&self) -> &Widget<E> {
        &self.widget
    }

    pub fn instance_mut(&mut self) -> &mut Widget<E> {
        &mut self.widget
    }

    #[must_use]
    pub fn into_instance(self) -> Widget<E> {
        self.widget
    }

    /// Bind `render` to `ctx` and install it as the widget's render function.
    ///
    /// `ctx` moves into the installed function; every later `render(target)`
    /// call invokes `render(&ctx, target)`.
    pub fn attach_render<C, F>(&mut self, ctx: C, render: F) -> &mut Widget<E>
    where
        C: Send + Sync + 'static,
        F: Fn(&C, &mut E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.widget.set_render(move |target: &mut E| render(&ctx, target));
        &mut self.widget
    }
}
