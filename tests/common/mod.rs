//! 测试公用设施：层级/题库测试数据与内存版数据源
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use exam_question_assign::error::{AppError, AppResult};
use exam_question_assign::models::{
    Assignment, Chapter, Course, Difficulty, Exam, Question, Subject, TaxonomySnapshot, Topic,
};
use exam_question_assign::AssignmentProvider;

/// 两个课程、重名科目、带一个挂链断裂的知识点
///
/// ```text
/// 课程1 初中部
///   ├─ 科目10 数学
///   │    ├─ 章节100 函数
///   │    │    ├─ 知识点1000 二次函数
///   │    │    └─ 知识点1001 一次函数
///   │    └─ 章节101 几何
///   │         └─ 知识点1010 三角形
///   └─ 科目11 物理
/// 课程2 高中部
///   └─ 科目20 数学
///        └─ 章节200 导数
///             └─ 知识点2000 求导法则
/// 知识点9999 （孤儿：父章节555不存在）
/// ```
pub fn sample_taxonomy() -> TaxonomySnapshot {
    TaxonomySnapshot {
        courses: vec![course(1, "初中部"), course(2, "高中部")],
        subjects: vec![
            subject(10, "数学", 1),
            subject(11, "物理", 1),
            subject(20, "数学", 2),
        ],
        chapters: vec![
            chapter(100, "函数", 10),
            chapter(101, "几何", 10),
            chapter(200, "导数", 20),
        ],
        topics: vec![
            topic(1000, "二次函数", 100),
            topic(1001, "一次函数", 100),
            topic(1010, "三角形", 101),
            topic(2000, "求导法则", 200),
            topic(9999, "孤儿知识点", 555),
        ],
    }
}

pub fn course(id: i64, name: &str) -> Course {
    Course {
        id,
        name: name.to_string(),
        description: None,
        is_active: true,
    }
}

pub fn subject(id: i64, name: &str, course_id: i64) -> Subject {
    Subject {
        id,
        name: name.to_string(),
        code: None,
        course_id,
    }
}

pub fn chapter(id: i64, name: &str, subject_id: i64) -> Chapter {
    Chapter {
        id,
        name: name.to_string(),
        chapter_number: None,
        subject_id,
    }
}

pub fn topic(id: i64, name: &str, chapter_id: i64) -> Topic {
    Topic {
        id,
        name: name.to_string(),
        topic_number: None,
        chapter_id,
    }
}

/// 四个层级字段任意组合的题目
pub fn question_scoped(
    id: i64,
    course_id: Option<i64>,
    subject_id: Option<i64>,
    chapter_id: Option<i64>,
    topic_id: Option<i64>,
) -> Question {
    Question {
        id,
        content: format!("题目{}", id),
        image_url: None,
        difficulty_level: Difficulty::Moderate,
        course_id,
        subject_id,
        chapter_id,
        topic_id,
        answers: Vec::new(),
    }
}

pub fn question_at_topic(id: i64, topic_id: i64) -> Question {
    question_scoped(id, None, None, None, Some(topic_id))
}

pub fn question_at_chapter(id: i64, chapter_id: i64) -> Question {
    question_scoped(id, None, None, Some(chapter_id), None)
}

pub fn question_at_subject(id: i64, subject_id: i64) -> Question {
    question_scoped(id, None, Some(subject_id), None, None)
}

pub fn question_at_course(id: i64, course_id: i64) -> Question {
    question_scoped(id, Some(course_id), None, None, None)
}

pub fn question_unscoped(id: i64) -> Question {
    question_scoped(id, None, None, None, None)
}

/// 四个层级字段任意组合的考试
pub fn exam_scoped(
    id: i64,
    course_id: Option<i64>,
    subject_id: Option<i64>,
    chapter_id: Option<i64>,
    topic_id: Option<i64>,
) -> Exam {
    Exam {
        id,
        title: format!("测试考试{}", id),
        description: None,
        duration_minutes: 60,
        max_marks: 100.0,
        max_questions: 0,
        status: Default::default(),
        course_id,
        subject_id,
        chapter_id,
        topic_id,
    }
}

pub fn assignment(id: i64, exam_id: i64, question_id: i64, marks: f64) -> Assignment {
    Assignment {
        id,
        exam_id,
        question_id,
        marks,
        question: None,
    }
}

// ========== 内存版数据源 ==========

struct MockState {
    exam: Exam,
    taxonomy: TaxonomySnapshot,
    questions: Vec<Question>,
    assignments: Vec<Assignment>,
    next_assignment_id: i64,
    fail_create_for: HashSet<i64>,
    fail_delete_for: HashSet<i64>,
    fail_update_marks: bool,
    fail_fetch_assignments: bool,
}

/// 内存版数据源，支持故障注入与调用计数
///
/// Clone 共享同一份内部状态，测试端持有一个克隆即可在
/// 会话外观察和篡改服务器数据。
#[derive(Clone)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
    fetch_assignments_calls: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new(
        exam: Exam,
        taxonomy: TaxonomySnapshot,
        questions: Vec<Question>,
        assignments: Vec<Assignment>,
    ) -> Self {
        let next_assignment_id = assignments.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        Self {
            state: Arc::new(Mutex::new(MockState {
                exam,
                taxonomy,
                questions,
                assignments,
                next_assignment_id,
                fail_create_for: HashSet::new(),
                fail_delete_for: HashSet::new(),
                fail_update_marks: false,
                fail_fetch_assignments: false,
            })),
            fetch_assignments_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("测试状态锁中毒")
    }

    /// 指定题目的新增操作注入失败
    pub fn fail_create_for(&self, question_id: i64) {
        self.lock().fail_create_for.insert(question_id);
    }

    /// 指定题目的删除操作注入失败
    pub fn fail_delete_for(&self, question_id: i64) {
        self.lock().fail_delete_for.insert(question_id);
    }

    pub fn set_fail_update_marks(&self, fail: bool) {
        self.lock().fail_update_marks = fail;
    }

    pub fn set_fail_fetch_assignments(&self, fail: bool) {
        self.lock().fail_fetch_assignments = fail;
    }

    /// 模拟其他管理员直接删掉一条分配
    pub fn remove_assignment_directly(&self, question_id: i64) {
        self.lock().assignments.retain(|a| a.question_id != question_id);
    }

    /// fetch_assignments 被调用的次数
    pub fn fetch_assignments_count(&self) -> usize {
        self.fetch_assignments_calls.load(Ordering::SeqCst)
    }

    /// 服务器侧当前的分配快照
    pub fn assignments_snapshot(&self) -> Vec<Assignment> {
        self.lock().assignments.clone()
    }

    /// 服务器侧已分配的题目ID（升序）
    pub fn assigned_question_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.lock().assignments.iter().map(|a| a.question_id).collect();
        ids.sort_unstable();
        ids
    }
}

#[async_trait]
impl AssignmentProvider for MockProvider {
    async fn fetch_exam(&self, exam_id: i64) -> AppResult<Exam> {
        let state = self.lock();
        if state.exam.id == exam_id {
            Ok(state.exam.clone())
        } else {
            Err(AppError::remote_bad_status(
                format!("/exams/{}", exam_id),
                404,
                Some("Exam not found".to_string()),
            ))
        }
    }

    async fn fetch_taxonomy(&self) -> AppResult<TaxonomySnapshot> {
        Ok(self.lock().taxonomy.clone())
    }

    async fn fetch_questions(&self) -> AppResult<Vec<Question>> {
        Ok(self.lock().questions.clone())
    }

    async fn fetch_assignments(&self, exam_id: i64) -> AppResult<Vec<Assignment>> {
        self.fetch_assignments_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        if state.fail_fetch_assignments {
            return Err(AppError::remote_bad_status(
                format!("/exams/{}/questions/", exam_id),
                500,
                Some("注入的拉取故障".to_string()),
            ));
        }
        Ok(state
            .assignments
            .iter()
            .filter(|a| a.exam_id == exam_id)
            .cloned()
            .collect())
    }

    async fn create_assignment(
        &self,
        exam_id: i64,
        question_id: i64,
        marks: f64,
    ) -> AppResult<Assignment> {
        let mut state = self.lock();
        if state.fail_create_for.contains(&question_id) {
            return Err(AppError::remote_bad_status(
                format!("/exams/{}/questions/", exam_id),
                500,
                Some("注入的创建故障".to_string()),
            ));
        }
        // 服务器对重复新增幂等，返回已有记录
        if let Some(existing) = state
            .assignments
            .iter()
            .find(|a| a.exam_id == exam_id && a.question_id == question_id)
        {
            return Ok(existing.clone());
        }
        let created = Assignment {
            id: state.next_assignment_id,
            exam_id,
            question_id,
            marks,
            question: None,
        };
        state.next_assignment_id += 1;
        state.assignments.push(created.clone());
        Ok(created)
    }

    async fn delete_assignment(&self, exam_id: i64, question_id: i64) -> AppResult<()> {
        let mut state = self.lock();
        if state.fail_delete_for.contains(&question_id) {
            return Err(AppError::remote_bad_status(
                format!("/exams/{}/questions/{}", exam_id, question_id),
                500,
                Some("注入的删除故障".to_string()),
            ));
        }
        let before = state.assignments.len();
        state
            .assignments
            .retain(|a| !(a.exam_id == exam_id && a.question_id == question_id));
        if state.assignments.len() == before {
            return Err(AppError::remote_bad_status(
                format!("/exams/{}/questions/{}", exam_id, question_id),
                404,
                Some("Question not found in this exam".to_string()),
            ));
        }
        Ok(())
    }

    async fn update_assignment_marks(
        &self,
        assignment: &Assignment,
        marks: f64,
    ) -> AppResult<Assignment> {
        let mut state = self.lock();
        if state.fail_update_marks {
            return Err(AppError::remote_bad_status(
                format!(
                    "/exams/{}/questions/{}/marks",
                    assignment.exam_id, assignment.question_id
                ),
                500,
                Some("注入的改分故障".to_string()),
            ));
        }
        match state.assignments.iter_mut().find(|a| a.id == assignment.id) {
            Some(entry) => {
                entry.marks = marks;
                let mut updated = entry.clone();
                // 单条操作的响应不内嵌题目
                updated.question = None;
                Ok(updated)
            }
            None => Err(AppError::remote_bad_status(
                format!(
                    "/exams/{}/questions/{}/marks",
                    assignment.exam_id, assignment.question_id
                ),
                404,
                Some("Assignment not found".to_string()),
            )),
        }
    }
}
