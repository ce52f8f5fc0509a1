pub mod panel_body;
pub mod title_banner;
pub mod weather_panel;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use panel_body::{PanelBody, PanelBodyProps};
pub use title_banner::{TitleBanner, TitleBannerProps};
pub use weather_panel::{WeatherPanel, WeatherPanelProps};
