//! User profile as returned by the login endpoint and persisted with the session.

use serde::{Deserialize, Serialize};

use examdesk_core::{ExamCenterId, HallId, UserId};

use crate::Role;

/// A hall the identity is permanently bound to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HallAssignment {
    pub id: HallId,
    pub exam_center_id: ExamCenterId,
}

/// An exam center the identity is permanently bound to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamCenterAssignment {
    pub id: ExamCenterId,
}

/// Effective confinement of an identity, after applying hall priority.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FixedAssignment {
    Hall {
        exam_center_id: ExamCenterId,
        hall_id: HallId,
    },
    ExamCenter {
        exam_center_id: ExamCenterId,
    },
}

impl FixedAssignment {
    /// Path prefix the identity is confined to.
    pub fn scope_prefix(&self) -> String {
        match self {
            Self::Hall {
                exam_center_id,
                hall_id,
            } => format!("/examination-centers/{exam_center_id}/hall/{hall_id}"),
            Self::ExamCenter { exam_center_id } => format!("/examination-centers/{exam_center_id}"),
        }
    }

    /// Where an identity outside its scope gets sent.
    pub fn landing_route(&self) -> String {
        match self {
            Self::Hall { .. } => self.scope_prefix(),
            Self::ExamCenter { .. } => format!("{}/exams", self.scope_prefix()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hall: Option<HallAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_center: Option<ExamCenterAssignment>,
}

impl UserProfile {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            roles: Vec::new(),
            hall: None,
            exam_center: None,
        }
    }

    pub fn with_hall(mut self, exam_center_id: ExamCenterId, hall_id: HallId) -> Self {
        self.hall = Some(HallAssignment {
            id: hall_id,
            exam_center_id,
        });
        self
    }

    pub fn with_exam_center(mut self, exam_center_id: ExamCenterId) -> Self {
        self.exam_center = Some(ExamCenterAssignment { id: exam_center_id });
        self
    }

    /// The fixed assignment, if any. A hall wins over an exam center when both
    /// are present; the backend does not enforce exclusivity.
    pub fn fixed_assignment(&self) -> Option<FixedAssignment> {
        if let Some(hall) = self.hall {
            return Some(FixedAssignment::Hall {
                exam_center_id: hall.exam_center_id,
                hall_id: hall.id,
            });
        }
        self.exam_center.map(|center| FixedAssignment::ExamCenter {
            exam_center_id: center.id,
        })
    }
}
