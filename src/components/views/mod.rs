mod episode;
mod home;
mod podcast;

pub use episode::EpisodeView;
pub use home::{EpisodeRow, Home};
pub use podcast::PodcastView;
