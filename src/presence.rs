//! Startup presence: maps configured status and activity strings onto
//! gateway values. Unrecognized values fall back to online / playing with
//! a warning rather than failing startup.

use log::warn;
use serenity::model::gateway::Activity;
use serenity::model::user::OnlineStatus;

pub fn parse_status(raw: &str) -> OnlineStatus {
    match raw {
        "online" => OnlineStatus::Online,
        "offline" => OnlineStatus::Offline,
        "invisible" => OnlineStatus::Invisible,
        "idle" => OnlineStatus::Idle,
        "doNotDisturb" => OnlineStatus::DoNotDisturb,
        other => {
            warn!("Unknown BOT_STATUS '{}', falling back to online", other);
            OnlineStatus::Online
        }
    }
}

pub fn parse_activity(kind: &str, name: &str) -> Activity {
    match kind {
        "PLAYING" => Activity::playing(name),
        "WATCHING" => Activity::watching(name),
        "LISTENING" => Activity::listening(name),
        "COMPETING" => Activity::competing(name),
        // Streaming needs a stream URL the configuration does not carry.
        "STREAMING" => {
            warn!("ACTIVITY_TYPE STREAMING requires a stream URL; falling back to playing");
            Activity::playing(name)
        }
        other => {
            warn!("Unknown ACTIVITY_TYPE '{}', falling back to playing", other);
            Activity::playing(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::model::gateway::ActivityType;

    #[test]
    fn known_statuses_map_directly() {
        assert_eq!(parse_status("online"), OnlineStatus::Online);
        assert_eq!(parse_status("idle"), OnlineStatus::Idle);
        assert_eq!(parse_status("doNotDisturb"), OnlineStatus::DoNotDisturb);
        assert_eq!(parse_status("invisible"), OnlineStatus::Invisible);
        assert_eq!(parse_status("offline"), OnlineStatus::Offline);
    }

    #[test]
    fn unknown_status_falls_back_to_online() {
        assert_eq!(parse_status("busy"), OnlineStatus::Online);
    }

    #[test]
    fn activity_types_map_to_gateway_activities() {
        assert_eq!(parse_activity("WATCHING", "the sky").kind, ActivityType::Watching);
        assert_eq!(parse_activity("LISTENING", "rain").kind, ActivityType::Listening);
        assert_eq!(parse_activity("COMPETING", "trivia").kind, ActivityType::Competing);
    }

    #[test]
    fn unknown_activity_falls_back_to_playing() {
        let activity = parse_activity("DANCING", "discord");
        assert_eq!(activity.kind, ActivityType::Playing);
        assert_eq!(activity.name, "discord");
    }
}
