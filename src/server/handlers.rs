//! HTTP handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::subscriptions::PositionTarget;
use crate::types::{Message, MessageInput, TopicInfo};

use super::error::{ApiError, ApiJson};
use super::request::{MessageResponse, PollRequest, PublishRequest, SubscriptionPositionRequest};
use super::AppState;

// --- POST /topic/{topic}/message ---

pub(crate) async fn publish(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    ApiJson(req): ApiJson<PublishRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut input = MessageInput::text(req.payload).with_properties(req.properties);
    if let Some(event_time) = req.event_time {
        input = input.with_event_time(event_time);
    }

    let message = Message::new(topic, input);
    let response = MessageResponse::from(&message);

    if let Err(e) = state.repo.add_message(message) {
        tracing::warn!(error = %e, topic = %response.topic, "error persisting message");
        return Err(e.into());
    }

    tracing::info!(
        topic = %response.topic,
        id = %response.id,
        published_time = %response.published_time,
        "message successfully published"
    );
    Ok(Json(response))
}

// --- GET /topic/{topic}/message/{message_id} ---

pub(crate) async fn get_message(
    State(state): State<AppState>,
    Path((topic, message_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.repo.get_message(&topic, &message_id).map_err(|e| {
        tracing::warn!(error = %e, "error retrieving message");
        ApiError::Broker(e)
    })?;
    Ok(Json(MessageResponse::from(message.as_ref())))
}

// --- GET /topic ---

pub(crate) async fn get_topics(State(state): State<AppState>) -> Json<Vec<TopicInfo>> {
    Json(state.repo.get_topics())
}

// --- GET /topic/{topic} ---

pub(crate) async fn get_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Result<Json<TopicInfo>, ApiError> {
    let info = state.repo.get_topic(&topic).map_err(|e| {
        tracing::warn!(error = %e, "error retrieving topic");
        ApiError::Broker(e)
    })?;
    Ok(Json(info))
}

// --- POST /topic/{topic}/poll ---

pub(crate) async fn poll(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    ApiJson(req): ApiJson<PollRequest>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let window = state
        .repo
        .poll_topic(&topic, &req.subscription_name, req.max_number_of_messages)
        .map_err(|e| {
            tracing::warn!(error = %e, subscription = %req.subscription_name, "error polling topic");
            ApiError::Broker(e)
        })?;

    tracing::debug!(
        topic = %topic,
        subscription = %req.subscription_name,
        count = window.len(),
        "delivered messages"
    );
    Ok(Json(window.iter().map(|m| MessageResponse::from(m.as_ref())).collect()))
}

// --- PUT /topic/{topic}/subscription/{subscription}/position ---

pub(crate) async fn set_position(
    State(state): State<AppState>,
    Path((topic, subscription)): Path<(String, String)>,
    ApiJson(req): ApiJson<SubscriptionPositionRequest>,
) -> Result<StatusCode, ApiError> {
    let target = PositionTarget::from_parts(req.message_id, req.published_time)?;

    state
        .repo
        .set_subscription_position(&topic, &subscription, target)
        .map_err(|e| {
            tracing::warn!(error = %e, subscription = %subscription, "error setting subscription position");
            ApiError::Broker(e)
        })?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::Broker;
    use crate::error::{BrokerError, Result};
    use crate::repository::Repository;
    use crate::types::Timestamp;
    use axum::response::IntoResponse;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(Arc::new(Broker::default()))
    }

    async fn publish_text(state: &AppState, topic: &str, payload: &str) -> MessageResponse {
        let req = PublishRequest {
            payload: payload.to_string(),
            ..Default::default()
        };
        let Json(message) = publish(State(state.clone()), Path(topic.to_string()), ApiJson(req))
            .await
            .unwrap();
        message
    }

    /// Repository that rejects every write as a duplicate.
    struct DuplicateRepository;

    impl Repository for DuplicateRepository {
        fn add_message(&self, message: Message) -> Result<()> {
            Err(BrokerError::DuplicateMessage(message.id))
        }
        fn get_message(&self, topic: &str, id: &str) -> Result<Arc<Message>> {
            Err(BrokerError::MessageNotFound {
                topic: topic.into(),
                id: id.into(),
            })
        }
        fn poll_topic(&self, topic: &str, _: &str, _: usize) -> Result<Vec<Arc<Message>>> {
            Err(BrokerError::TopicNotFound(topic.into()))
        }
        fn set_subscription_position(&self, topic: &str, _: &str, _: PositionTarget) -> Result<()> {
            Err(BrokerError::TopicNotFound(topic.into()))
        }
        fn get_topics(&self) -> Vec<TopicInfo> {
            Vec::new()
        }
        fn get_topic(&self, id: &str) -> Result<TopicInfo> {
            Err(BrokerError::TopicNotFound(id.into()))
        }
    }

    #[tokio::test]
    async fn test_publish() {
        let state = state();
        let req = PublishRequest {
            properties: [("k".to_string(), "v".to_string())].into(),
            event_time: Some(Timestamp(99)),
            payload: "Some payload".to_string(),
        };

        let Json(message) = publish(State(state.clone()), Path("orders".into()), ApiJson(req))
            .await
            .unwrap();

        assert_eq!(message.topic, "orders");
        assert_eq!(message.payload, "Some payload");
        assert_eq!(message.event_time, Some(Timestamp(99)));
        assert_eq!(message.properties.get("k").map(String::as_str), Some("v"));
        assert!(state.repo.get_message("orders", &message.id).is_ok());
    }

    #[tokio::test]
    async fn test_publish_duplicate_is_conflict() {
        let state = AppState::new(Arc::new(DuplicateRepository));
        let req = PublishRequest {
            payload: "x".into(),
            ..Default::default()
        };

        let response = publish(State(state), Path("orders".into()), ApiJson(req))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_get_message() {
        let state = state();
        let published = publish_text(&state, "orders", "hello").await;

        let Json(message) = get_message(
            State(state.clone()),
            Path(("orders".to_string(), published.id.clone())),
        )
        .await
        .unwrap();
        assert_eq!(message, published);
    }

    #[tokio::test]
    async fn test_get_message_not_found() {
        let state = state();
        publish_text(&state, "orders", "hello").await;

        let response = get_message(
            State(state.clone()),
            Path(("orders".to_string(), "message1".to_string())),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get_message(
            State(state),
            Path(("missing".to_string(), "message1".to_string())),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_topics() {
        let state = state();
        let Json(topics) = get_topics(State(state.clone())).await;
        assert!(topics.is_empty());

        for topic in ["topic1", "topic2", "topic3"] {
            publish_text(&state, topic, "x").await;
        }

        let Json(topics) = get_topics(State(state)).await;
        assert_eq!(topics.len(), 3);
    }

    #[tokio::test]
    async fn test_get_topic() {
        let state = state();
        publish_text(&state, "topic1", "x").await;

        let Json(topic) = get_topic(State(state.clone()), Path("topic1".into()))
            .await
            .unwrap();
        assert_eq!(topic.id, "topic1");
        assert_eq!(topic.message_count, 1);

        let response = get_topic(State(state), Path("topic2".into()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_poll_and_reposition() {
        let state = state();
        let mut ids = Vec::new();
        for i in 0..4 {
            ids.push(publish_text(&state, "T", &format!("m{i}")).await.id);
        }

        let poll_req = || PollRequest {
            subscription_name: "S".into(),
            max_number_of_messages: 3,
        };

        let Json(window) = poll(State(state.clone()), Path("T".into()), ApiJson(poll_req()))
            .await
            .unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].id, ids[0]);

        let status = set_position(
            State(state.clone()),
            Path(("T".to_string(), "S".to_string())),
            ApiJson(SubscriptionPositionRequest {
                message_id: Some(ids[1].clone()),
                published_time: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(window) = poll(State(state), Path("T".into()), ApiJson(poll_req()))
            .await
            .unwrap();
        let got: Vec<&str> = window.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(got, vec![ids[1].as_str(), ids[2].as_str(), ids[3].as_str()]);
    }

    #[tokio::test]
    async fn test_poll_unknown_topic() {
        let req = PollRequest {
            subscription_name: "S".into(),
            max_number_of_messages: 1,
        };
        let response = poll(State(state()), Path("nope".into()), ApiJson(req))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_set_position_rejects_both_criteria() {
        let state = state();
        publish_text(&state, "T", "x").await;

        let response = set_position(
            State(state),
            Path(("T".to_string(), "S".to_string())),
            ApiJson(SubscriptionPositionRequest {
                message_id: Some("m".into()),
                published_time: Some(Timestamp(1)),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
