//! Demo tool bodies
//!
//! These are deterministic lookups and templates. They are registered through
//! [`ToolKind`](crate::ToolKind); nothing here talks to the network.

pub mod code;
pub mod color;
pub mod haiku;
pub mod recipe;
pub mod time;
pub mod weather;

pub use code::{CodeSnippet, CodeSnippetInput};
pub use color::BackgroundColorInput;
pub use haiku::{Haiku, HaikuInput};
pub use recipe::{Recipe, RecipeInput};
pub use time::CurrentTimeInput;
pub use weather::{WeatherInput, WeatherReport};
