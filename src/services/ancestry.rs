//! 层级祖先索引 - 业务能力层
//!
//! 把一次性拉取的层级数据整理成 child → parent 映射，
//! 供范围包含判定做快速祖先查询。

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{ChapterId, CourseId, ScopeRef, SubjectId, TaxonomySnapshot, TopicId};

/// 预计算的祖先索引
///
/// 职责：
/// - 回答"某章节/知识点属于哪个科目、哪个课程"
/// - 回答"范围 A 是否落在范围 B 之内"
/// - 提供层级路径的显示名称
/// - 不做任何网络请求
///
/// 挂链断裂（父级ID在数据里找不到）时查询返回 None，
/// 包含判定随之返回 false：宁可少选，不能错选。
#[derive(Debug, Default)]
pub struct AncestryIndex {
    subject_course: BTreeMap<SubjectId, CourseId>,
    chapter_subject: BTreeMap<ChapterId, SubjectId>,
    topic_chapter: BTreeMap<TopicId, ChapterId>,
    course_names: BTreeMap<CourseId, String>,
    subject_names: BTreeMap<SubjectId, String>,
    chapter_names: BTreeMap<ChapterId, String>,
    topic_names: BTreeMap<TopicId, String>,
}

impl AncestryIndex {
    /// 从层级快照构建索引
    pub fn build(snapshot: &TaxonomySnapshot) -> Self {
        let mut index = Self::default();
        for course in &snapshot.courses {
            index.course_names.insert(course.id, course.name.clone());
        }
        for subject in &snapshot.subjects {
            index.subject_course.insert(subject.id, subject.course_id);
            index.subject_names.insert(subject.id, subject.name.clone());
        }
        for chapter in &snapshot.chapters {
            index.chapter_subject.insert(chapter.id, chapter.subject_id);
            index.chapter_names.insert(chapter.id, chapter.name.clone());
        }
        for topic in &snapshot.topics {
            index.topic_chapter.insert(topic.id, topic.chapter_id);
            index.topic_names.insert(topic.id, topic.name.clone());
        }
        debug!(
            "层级索引构建完成: {} 课程 / {} 科目 / {} 章节 / {} 知识点",
            index.course_names.len(),
            index.subject_names.len(),
            index.chapter_names.len(),
            index.topic_names.len()
        );
        index
    }

    /// 科目所属的课程
    pub fn course_of_subject(&self, subject_id: SubjectId) -> Option<CourseId> {
        self.subject_course.get(&subject_id).copied()
    }

    /// 章节所属的科目
    pub fn subject_of_chapter(&self, chapter_id: ChapterId) -> Option<SubjectId> {
        self.chapter_subject.get(&chapter_id).copied()
    }

    /// 知识点所属的章节
    pub fn chapter_of_topic(&self, topic_id: TopicId) -> Option<ChapterId> {
        self.topic_chapter.get(&topic_id).copied()
    }

    /// 章节所属的课程（经科目两跳）
    pub fn course_of_chapter(&self, chapter_id: ChapterId) -> Option<CourseId> {
        self.subject_of_chapter(chapter_id)
            .and_then(|s| self.course_of_subject(s))
    }

    /// 知识点所属的科目（经章节两跳）
    pub fn subject_of_topic(&self, topic_id: TopicId) -> Option<SubjectId> {
        self.chapter_of_topic(topic_id)
            .and_then(|c| self.subject_of_chapter(c))
    }

    /// 知识点所属的课程（经章节、科目三跳）
    pub fn course_of_topic(&self, topic_id: TopicId) -> Option<CourseId> {
        self.subject_of_topic(topic_id)
            .and_then(|s| self.course_of_subject(s))
    }

    /// 任意范围归属的课程
    pub fn resolve_course(&self, scope: ScopeRef) -> Option<CourseId> {
        match scope {
            ScopeRef::Course(id) => Some(id),
            ScopeRef::Subject(id) => self.course_of_subject(id),
            ScopeRef::Chapter(id) => self.course_of_chapter(id),
            ScopeRef::Topic(id) => self.course_of_topic(id),
        }
    }

    /// 任意范围归属的科目（课程层范围没有科目，返回 None）
    pub fn resolve_subject(&self, scope: ScopeRef) -> Option<SubjectId> {
        match scope {
            ScopeRef::Course(_) => None,
            ScopeRef::Subject(id) => Some(id),
            ScopeRef::Chapter(id) => self.subject_of_chapter(id),
            ScopeRef::Topic(id) => self.subject_of_topic(id),
        }
    }

    /// 判定 `inner` 是否落在 `outer` 范围之内
    ///
    /// "落在之内"要求 inner 不宽于 outer 且祖先链指回 outer：
    /// 章节层考试不收只标到科目的题目，反过来科目层考试
    /// 收该科目下任何章节、知识点的题目。
    pub fn contains(&self, outer: ScopeRef, inner: ScopeRef) -> bool {
        match outer {
            ScopeRef::Topic(t) => matches!(inner, ScopeRef::Topic(i) if i == t),
            ScopeRef::Chapter(c) => match inner {
                ScopeRef::Chapter(i) => i == c,
                ScopeRef::Topic(t) => self.chapter_of_topic(t) == Some(c),
                _ => false,
            },
            ScopeRef::Subject(s) => match inner {
                ScopeRef::Subject(i) => i == s,
                ScopeRef::Chapter(c) => self.subject_of_chapter(c) == Some(s),
                ScopeRef::Topic(t) => self.subject_of_topic(t) == Some(s),
                _ => false,
            },
            ScopeRef::Course(k) => match inner {
                ScopeRef::Course(i) => i == k,
                ScopeRef::Subject(s) => self.course_of_subject(s) == Some(k),
                ScopeRef::Chapter(c) => self.course_of_chapter(c) == Some(k),
                ScopeRef::Topic(t) => self.course_of_topic(t) == Some(k),
            },
        }
    }

    /// 索引里是否存在该范围节点
    pub fn knows(&self, scope: ScopeRef) -> bool {
        match scope {
            ScopeRef::Course(id) => self.course_names.contains_key(&id),
            ScopeRef::Subject(id) => self.subject_names.contains_key(&id),
            ScopeRef::Chapter(id) => self.chapter_names.contains_key(&id),
            ScopeRef::Topic(id) => self.topic_names.contains_key(&id),
        }
    }

    /// 从课程到该节点的显示路径，挂链断裂处截断
    pub fn scope_path(&self, scope: ScopeRef) -> Vec<String> {
        let mut path = Vec::new();
        let mut cursor = Some(scope);
        while let Some(node) = cursor {
            path.push(self.node_label(node));
            cursor = self.parent_of(node);
        }
        path.reverse();
        path
    }

    /// 形如"高中数学 / 函数 / 二次函数"的单行路径
    pub fn scope_label(&self, scope: ScopeRef) -> String {
        self.scope_path(scope).join(" / ")
    }

    fn parent_of(&self, scope: ScopeRef) -> Option<ScopeRef> {
        match scope {
            ScopeRef::Course(_) => None,
            ScopeRef::Subject(id) => self.course_of_subject(id).map(ScopeRef::Course),
            ScopeRef::Chapter(id) => self.subject_of_chapter(id).map(ScopeRef::Subject),
            ScopeRef::Topic(id) => self.chapter_of_topic(id).map(ScopeRef::Chapter),
        }
    }

    fn node_label(&self, scope: ScopeRef) -> String {
        let name = match scope {
            ScopeRef::Course(id) => self.course_names.get(&id),
            ScopeRef::Subject(id) => self.subject_names.get(&id),
            ScopeRef::Chapter(id) => self.chapter_names.get(&id),
            ScopeRef::Topic(id) => self.topic_names.get(&id),
        };
        match name {
            Some(n) => n.clone(),
            None => format!("{}#{}", scope.level_name(), scope.id()),
        }
    }
}
