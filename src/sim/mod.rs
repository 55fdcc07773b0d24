pub mod plugin;
pub mod resources;
pub mod state;
pub mod systems;

pub use plugin::SurveyPlugin;
pub use state::SurveyState;
