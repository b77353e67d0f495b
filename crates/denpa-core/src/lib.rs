pub mod airtime;
pub mod classify;
pub mod clock;
pub mod display;
pub mod models;
pub mod resolver;

pub use airtime::{
    get_air_date_time, parse_air_time, parse_duration_to_minutes, DEFAULT_EPISODE_DURATION_MIN,
};
pub use classify::{
    calculate_countdown, get_air_time_info, has_already_aired, is_airing_today,
    is_currently_airing, AirTimeInfo, CountdownStyle,
};
pub use clock::Clock;
pub use display::{get_air_time_display, AirTimeDisplay, DisplayVariant};
pub use models::{Episode, TrackedItem};
pub use resolver::{find_next_episode, NextEpisode};
