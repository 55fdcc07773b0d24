use bevy::prelude::*;

#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum SurveyState {
    #[default] // Startzustand
    Surveying,
    /// Path exhausted: summary, plot and exit run on entry.
    Finished,
}
