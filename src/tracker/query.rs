/// JQL templates for the parent and child searches of one sprint.
///
/// Queries are plain concatenations: the sprint clause followed by the
/// parent filter, or by the child filter and the parent's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplates {
    sprint: String,
    parent_jql: String,
    child_jql: String,
}

impl QueryTemplates {
    pub fn new(
        sprint: impl Into<String>,
        parent_jql: impl Into<String>,
        child_jql: impl Into<String>,
    ) -> Self {
        Self {
            sprint: sprint.into(),
            parent_jql: parent_jql.into(),
            child_jql: child_jql.into(),
        }
    }

    /// Same filters against a different sprint clause
    pub fn with_sprint(&self, sprint: impl Into<String>) -> Self {
        Self {
            sprint: sprint.into(),
            ..self.clone()
        }
    }

    pub fn sprint(&self) -> &str {
        &self.sprint
    }

    pub fn parent_query(&self) -> String {
        format!("{}{}", self.sprint, self.parent_jql)
    }

    pub fn child_query(&self, parent_id: &str) -> String {
        format!("{}{}{}", self.sprint, self.child_jql, parent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> QueryTemplates {
        QueryTemplates::new(
            "sprint = 42",
            " AND issuetype = Story",
            " AND issuetype = Sub-task AND parent = ",
        )
    }

    #[test]
    fn test_parent_query() {
        assert_eq!(templates().parent_query(), "sprint = 42 AND issuetype = Story");
    }

    #[test]
    fn test_child_query_appends_parent_id() {
        assert_eq!(
            templates().child_query("10042"),
            "sprint = 42 AND issuetype = Sub-task AND parent = 10042"
        );
    }

    #[test]
    fn test_with_sprint_keeps_filters() {
        let other = templates().with_sprint("sprint = 43");
        assert_eq!(other.sprint(), "sprint = 43");
        assert_eq!(other.parent_query(), "sprint = 43 AND issuetype = Story");
    }
}
