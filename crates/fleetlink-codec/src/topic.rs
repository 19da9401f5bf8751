use crate::error::{CodecError, CodecResult};
use fleetlink_domain::{Channel, Method};

/// Control prefix of all device management topics.
pub const TOPIC_PREFIX: &str = "$FLT";

/// Verb segment marking a reply topic.
pub const REPLY_VERB: &str = "REPLY";

/// Application name of the lifecycle message kind.
pub const LIFECYCLE_APP: &str = "LIFECYCLE";

// Minimum inbound segment counts: prefix/scope/client/app/verb (+request id
// for replies).
const MIN_SEGMENTS: usize = 5;
const MIN_REPLY_SEGMENTS: usize = 6;

/// Wire verb for a canonical request method.
pub fn method_verb(method: Method) -> &'static str {
    match method {
        Method::Read => "GET",
        Method::Write => "PUT",
        Method::Execute => "EXE",
        Method::Create => "NEW",
        Method::Delete => "DEL",
    }
}

/// Canonical method for a wire verb.
pub fn verb_method(verb: &str) -> Option<Method> {
    match verb {
        "GET" => Some(Method::Read),
        "PUT" => Some(Method::Write),
        "EXE" => Some(Method::Execute),
        "NEW" => Some(Method::Create),
        "DEL" => Some(Method::Delete),
        _ => None,
    }
}

/// Flat ordered segment form of a canonical channel:
/// `[app-version, verb, resource...]`.
pub fn channel_segments(channel: &Channel) -> Vec<String> {
    let mut segments = Vec::with_capacity(2 + channel.resource.len());
    segments.push(format!("{}-{}", channel.app_name, channel.app_version));
    segments.push(method_verb(channel.method).to_string());
    segments.extend(channel.resource.iter().cloned());
    segments
}

/// Request topic addressed to a device agent:
/// `$FLT/{scope}/{client}/{APP}-{VN}/{VERB}/{resource...}`.
pub fn request_topic(scope_id: &str, client_id: &str, channel: &Channel) -> String {
    let mut segments = vec![
        TOPIC_PREFIX.to_string(),
        scope_id.to_string(),
        client_id.to_string(),
    ];
    segments.extend(channel_segments(channel));
    segments.join("/")
}

/// Reply topic the platform subscribes to:
/// `$FLT/{scope}/{requester_client}/{APP}-{VN}/REPLY/{request_id}`.
pub fn reply_topic(
    scope_id: &str,
    requester_client_id: &str,
    channel: &Channel,
    request_id: &str,
) -> String {
    [
        TOPIC_PREFIX,
        scope_id,
        requester_client_id,
        &format!("{}-{}", channel.app_name, channel.app_version),
        REPLY_VERB,
        request_id,
    ]
    .join("/")
}

/// Inbound topic classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicKind {
    /// Reply to an outstanding request.
    Reply { request_id: String },
    /// Unsolicited lifecycle event (BIRTH, DEATH, ...).
    Lifecycle { event: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTopic {
    pub scope_id: String,
    pub client_id: String,
    pub app_name: String,
    pub app_version: String,
    pub kind: TopicKind,
}

/// Decode an inbound topic. Inverse of the encoders above; rejects segment
/// arrays shorter than the minimum required count.
pub fn parse_topic(topic: &str) -> CodecResult<ParsedTopic> {
    let segments: Vec<&str> = topic.split('/').collect();
    if segments.len() < MIN_SEGMENTS {
        return Err(CodecError::ChannelTranslation(format!(
            "topic has {} segments, expected at least {}: {}",
            segments.len(),
            MIN_SEGMENTS,
            topic
        )));
    }
    if segments[0] != TOPIC_PREFIX {
        return Err(CodecError::ChannelTranslation(format!(
            "topic does not start with {}: {}",
            TOPIC_PREFIX, topic
        )));
    }

    let (app_name, app_version) = split_app_segment(segments[3])?;
    let scope_id = segments[1].to_string();
    let client_id = segments[2].to_string();
    let verb = segments[4];

    let kind = if verb == REPLY_VERB {
        if segments.len() < MIN_REPLY_SEGMENTS {
            return Err(CodecError::ChannelTranslation(format!(
                "reply topic is missing the request id segment: {}",
                topic
            )));
        }
        TopicKind::Reply {
            request_id: segments[5].to_string(),
        }
    } else if app_name == LIFECYCLE_APP {
        TopicKind::Lifecycle {
            event: verb.to_string(),
        }
    } else {
        return Err(CodecError::ChannelTranslation(format!(
            "unexpected inbound verb {} on topic {}",
            verb, topic
        )));
    };

    Ok(ParsedTopic {
        scope_id,
        client_id,
        app_name,
        app_version,
        kind,
    })
}

fn split_app_segment(segment: &str) -> CodecResult<(String, String)> {
    match segment.rsplit_once('-') {
        Some((name, version)) if !name.is_empty() && !version.is_empty() => {
            Ok((name.to_string(), version.to_string()))
        }
        _ => Err(CodecError::ChannelTranslation(format!(
            "application segment is not of the form NAME-VERSION: {}",
            segment
        ))),
    }
}
