//! 考试平台 HTTP 客户端
//!
//! 直连考试平台 REST 接口的 [`AssignmentProvider`] 实现。
//! 列表接口服务器按页返回，这里统一翻页拉全。

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{
    Assignment, Chapter, Course, Exam, ExamId, Question, QuestionId, Subject, TaxonomySnapshot,
    Topic,
};

use super::provider::AssignmentProvider;

/// 考试平台 HTTP 客户端
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
    token: String,
    page_size: usize,
}

impl HttpProvider {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Other(format!("创建 HTTP 客户端失败: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            page_size: config.page_size.max(1),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 非成功状态转为错误，并尽量带上服务器的 detail 信息
    async fn check_status(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::remote_bad_status(
            path,
            status.as_u16(),
            extract_detail(&body),
        ))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| AppError::remote_request_failed(path, e))?;
        let response = self.check_status(path, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::remote_decode_failed(path, e))
    }

    /// 翻页拉全一个列表接口
    ///
    /// `path` 需带结尾斜杠（服务器路由风格），返回条数不足一页
    /// 即认为拉完。
    async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        let mut skip = 0usize;
        loop {
            let page_path = format!("{}?skip={}&limit={}", path, skip, self.page_size);
            let mut page: Vec<T> = self.get_json(&page_path).await?;
            let fetched = page.len();
            items.append(&mut page);
            if fetched < self.page_size {
                break;
            }
            skip += fetched;
        }
        Ok(items)
    }
}

#[async_trait]
impl AssignmentProvider for HttpProvider {
    async fn fetch_exam(&self, exam_id: ExamId) -> AppResult<Exam> {
        self.get_json(&format!("/exams/{}", exam_id)).await
    }

    async fn fetch_taxonomy(&self) -> AppResult<TaxonomySnapshot> {
        // 四级层级并发拉取
        let (courses, subjects, chapters, topics) = tokio::try_join!(
            self.get_all_pages::<Course>("/courses/"),
            self.get_all_pages::<Subject>("/subjects/"),
            self.get_all_pages::<Chapter>("/chapters/"),
            self.get_all_pages::<Topic>("/topics/"),
        )?;
        Ok(TaxonomySnapshot {
            courses,
            subjects,
            chapters,
            topics,
        })
    }

    async fn fetch_questions(&self) -> AppResult<Vec<Question>> {
        self.get_all_pages("/questions/").await
    }

    async fn fetch_assignments(&self, exam_id: ExamId) -> AppResult<Vec<Assignment>> {
        self.get_all_pages(&format!("/exams/{}/questions/", exam_id))
            .await
    }

    async fn create_assignment(
        &self,
        exam_id: ExamId,
        question_id: QuestionId,
        marks: f64,
    ) -> AppResult<Assignment> {
        let path = format!("/exams/{}/questions/", exam_id);
        let url = self.url(&path);
        debug!("POST {} 题目 {} 分值 {}", url, question_id, marks);
        let body = json!({
            "exam_id": exam_id,
            "question_id": question_id,
            "marks": marks,
        });
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::remote_request_failed(path.as_str(), e))?;
        let response = self.check_status(&path, response).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::remote_decode_failed(path.as_str(), e))
    }

    async fn delete_assignment(&self, exam_id: ExamId, question_id: QuestionId) -> AppResult<()> {
        let path = format!("/exams/{}/questions/{}", exam_id, question_id);
        let url = self.url(&path);
        debug!("DELETE {}", url);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| AppError::remote_request_failed(path.as_str(), e))?;
        self.check_status(&path, response).await?;
        Ok(())
    }

    async fn update_assignment_marks(
        &self,
        assignment: &Assignment,
        marks: f64,
    ) -> AppResult<Assignment> {
        let path = format!(
            "/exams/{}/questions/{}/marks",
            assignment.exam_id, assignment.question_id
        );
        let url = self.url(&path);
        debug!("PUT {} 分值 {}", url, marks);
        // marks 走查询参数，与服务器签名一致
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .query(&[("marks", marks)])
            .send()
            .await
            .map_err(|e| AppError::remote_request_failed(path.as_str(), e))?;
        let response = self.check_status(&path, response).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::remote_decode_failed(path.as_str(), e))
    }
}

/// 从错误响应体里提取 detail 字段，取不到就用原文
fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .and_then(|d| d.as_str())
                .map(|s| s.to_string())
        })
        .or_else(|| Some(trimmed.to_string()))
}
