pub mod theme_renderer;
