use serde::{Deserialize, Serialize};

pub type CourseId = i64;
pub type SubjectId = i64;
pub type ChapterId = i64;
pub type TopicId = i64;

/// 课程（层级最外层）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// 科目，挂在课程下
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    pub course_id: CourseId,
}

/// 章节，挂在科目下
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub name: String,
    #[serde(default)]
    pub chapter_number: Option<i32>,
    pub subject_id: SubjectId,
}

/// 知识点（层级最内层），挂在章节下
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
    #[serde(default)]
    pub topic_number: Option<i32>,
    pub chapter_id: ChapterId,
}

fn default_active() -> bool {
    true
}

/// 一次性拉取的完整层级数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomySnapshot {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl TaxonomySnapshot {
    /// 四级节点总数
    pub fn node_count(&self) -> usize {
        self.courses.len() + self.subjects.len() + self.chapters.len() + self.topics.len()
    }
}

/// 考试或题目的生效层级范围
///
/// 四个层级字段中取最具体的一个：知识点 > 章节 > 科目 > 课程。
/// 永远不用假ID代替"课程层"之类的说法，范围就是带类型的节点引用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeRef {
    Course(CourseId),
    Subject(SubjectId),
    Chapter(ChapterId),
    Topic(TopicId),
}

impl ScopeRef {
    /// 按"最具体优先"规则从四个层级字段推导范围
    ///
    /// 后端以 0 表示未设置，这里把 0 与缺失同等对待。
    /// 四个字段全部缺失时返回 `None`。
    pub fn from_level_fields(
        course_id: Option<i64>,
        subject_id: Option<i64>,
        chapter_id: Option<i64>,
        topic_id: Option<i64>,
    ) -> Option<Self> {
        if let Some(id) = normalize_id(topic_id) {
            return Some(ScopeRef::Topic(id));
        }
        if let Some(id) = normalize_id(chapter_id) {
            return Some(ScopeRef::Chapter(id));
        }
        if let Some(id) = normalize_id(subject_id) {
            return Some(ScopeRef::Subject(id));
        }
        normalize_id(course_id).map(ScopeRef::Course)
    }

    /// 层级的中文名称
    pub fn level_name(self) -> &'static str {
        match self {
            ScopeRef::Course(_) => "课程",
            ScopeRef::Subject(_) => "科目",
            ScopeRef::Chapter(_) => "章节",
            ScopeRef::Topic(_) => "知识点",
        }
    }

    /// 范围节点的ID
    pub fn id(self) -> i64 {
        match self {
            ScopeRef::Course(id)
            | ScopeRef::Subject(id)
            | ScopeRef::Chapter(id)
            | ScopeRef::Topic(id) => id,
        }
    }
}

impl std::fmt::Display for ScopeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.level_name(), self.id())
    }
}

/// 0 视为未设置
fn normalize_id(value: Option<i64>) -> Option<i64> {
    value.filter(|&v| v > 0)
}
