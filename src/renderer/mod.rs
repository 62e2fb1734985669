//! Dirty-region compositing renderer
//!
//! Only pixels a moving layer could have touched are repainted. Each such
//! pixel is recomputed from scratch by probing every layer in paint order.

pub mod compositor;

pub use compositor::Renderer;
