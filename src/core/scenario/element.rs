//=========================================================================
// Screen Elements
//=========================================================================
//
// Ordered collection of the renderable pieces a scenario owns.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::FrameContext;
use crate::core::host_bridge::RenderBackend;

//=== FrameElement ========================================================

/// A piece of a screen that advances and draws once per frame.
pub trait FrameElement<R: RenderBackend>: Send {
    /// Advances simulation state (counters, collisions, input reactions).
    fn step(&mut self, ctx: &mut FrameContext<'_, R>);

    /// Issues draw calls against the concrete backend.
    fn draw(&mut self, renderer: &mut R);
}

//=== ElementList =========================================================

/// Elements in registration order; frames visit them front to back.
pub struct ElementList<R: RenderBackend> {
    elements: Vec<Box<dyn FrameElement<R>>>,
}

impl<R: RenderBackend> ElementList<R> {
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// Appends an element; it will step and draw after all earlier ones.
    pub fn push<E>(&mut self, element: E)
    where
        E: FrameElement<R> + 'static,
    {
        self.elements.push(Box::new(element));
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Drops every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Steps then draws each element, in registration order.
    pub fn process_and_draw(&mut self, ctx: &mut FrameContext<'_, R>) {
        for element in &mut self.elements {
            element.step(ctx);
            element.draw(ctx.renderer());
        }
    }
}

impl<R: RenderBackend> Default for ElementList<R> {
    fn default() -> Self {
        Self::new()
    }
}
