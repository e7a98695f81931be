//! Conversion logic between DTOs and domain entities.

use crate::domain::entity;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<entity::Member> for dto::UserDto {
    fn from(model: entity::Member) -> Self {
        Self {
            id: model.user_id.into_string(),
            name: model.name,
            image: model.image,
            position: model.position,
            rotation: model.rotation,
            customization: model.customization,
        }
    }
}

impl From<entity::ChatMessage> for dto::ChatMessageDto {
    fn from(model: entity::ChatMessage) -> Self {
        Self {
            id: model.id.into_string(),
            user_id: model.user_id.into_string(),
            user_name: model.user_name,
            message: model.text.into_string(),
            timestamp: model.timestamp.value(),
        }
    }
}
