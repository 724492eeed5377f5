use serde::{Deserialize, Serialize};

use super::exam::ExamId;
use super::question::{Question, QuestionId};

pub type AssignmentId = i64;

/// 默认分值：选中题目后未填写分值时回落到这里
pub const DEFAULT_MARKS: f64 = 1.0;

/// 考试与题目的分配记录
///
/// 服务器的响应体不带顶层 question_id 字段，题目ID内嵌在
/// question 对象里；反序列化对两种形态都兼容，两处都取不到
/// 才算坏数据。
#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub exam_id: ExamId,
    pub question_id: QuestionId,
    pub marks: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
}

/// 响应体的原始形态，question_id 与 question 都可能缺失
#[derive(Deserialize)]
struct AssignmentWire {
    id: AssignmentId,
    exam_id: ExamId,
    #[serde(default)]
    question_id: Option<QuestionId>,
    marks: f64,
    #[serde(default)]
    question: Option<Question>,
}

impl<'de> Deserialize<'de> for Assignment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wire = AssignmentWire::deserialize(deserializer)?;
        let question_id = wire
            .question_id
            .or_else(|| wire.question.as_ref().map(|q| q.id))
            .ok_or_else(|| serde::de::Error::missing_field("question_id"))?;
        Ok(Assignment {
            id: wire.id,
            exam_id: wire.exam_id,
            question_id,
            marks: wire.marks,
            question: wire.question,
        })
    }
}

/// 分值合法性：非负的有限数
pub fn marks_is_valid(marks: f64) -> bool {
    marks.is_finite() && marks >= 0.0
}

/// 非法分值回落到默认值
pub fn sanitize_marks(marks: f64) -> f64 {
    if marks_is_valid(marks) {
        marks
    } else {
        DEFAULT_MARKS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_list_shape_without_top_level_question_id() {
        // 列表与单条接口的真实字段集：题目ID只在内嵌 question 里
        let body = r#"[
            {
                "id": 7,
                "exam_id": 3,
                "marks": 2.0,
                "question": {
                    "id": 41,
                    "content": "<p>求二次函数的顶点坐标</p>",
                    "image_url": null,
                    "difficulty_level": "moderate",
                    "topic_id": 1000,
                    "answers": []
                },
                "created_at": "2026-08-21T10:00:00",
                "updated_at": null
            }
        ]"#;
        let parsed: Vec<Assignment> = serde_json::from_str(body).expect("解析列表响应失败");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, 7);
        assert_eq!(parsed[0].exam_id, 3);
        assert_eq!(parsed[0].question_id, 41);
        assert_eq!(parsed[0].marks, 2.0);
        assert!(parsed[0].question.is_some());
    }

    #[test]
    fn test_decode_with_explicit_question_id() {
        let body = r#"{"id": 8, "exam_id": 3, "question_id": 52, "marks": 1.5}"#;
        let parsed: Assignment = serde_json::from_str(body).expect("解析失败");
        assert_eq!(parsed.question_id, 52);
        assert!(parsed.question.is_none());
    }

    #[test]
    fn test_decode_without_any_question_identity_fails() {
        let body = r#"{
            "id": 9,
            "exam_id": 3,
            "marks": 2.0,
            "question": null,
            "created_at": "2026-08-21T10:00:00",
            "updated_at": null
        }"#;
        let err = serde_json::from_str::<Assignment>(body).expect_err("缺题目ID应报错");
        assert!(err.to_string().contains("question_id"));
    }
}
