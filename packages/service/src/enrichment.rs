//! # ユーザー補完
//!
//! レコードが参照するユーザー ID をユーザーディレクトリと突き合わせ、
//! 解決済みの [`UserInfo`] を添付する。
//!
//! 結合処理は I/O を持たない純粋関数とし、ディレクトリの取得は呼び出し側が行う。
//! 同じディレクトリで何度実行しても結果は変わらない。

use std::collections::HashMap;

use flowlink_domain::{Process, Task, UserInfo};
use itertools::Itertools;

/// ID で引けるユーザーディレクトリ
///
/// 同じ ID が複数含まれる場合は最初のものを採用する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: Vec<UserInfo>,
    index: HashMap<String, usize>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserInfo>) -> Self {
        let mut index = HashMap::with_capacity(users.len());
        for (position, user) in users.iter().enumerate() {
            index.entry(user.id.clone()).or_insert(position);
        }
        Self { users, index }
    }

    pub fn get(&self, id: &str) -> Option<&UserInfo> {
        self.index.get(id).map(|&position| &self.users[position])
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// タスクが参照する担当者 ID（重複・空文字列を除く、出現順）
pub fn referenced_assignees(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().filter_map(Task::assignee_id).unique().collect()
}

/// プロセスが参照する開始ユーザー ID（重複・空文字列を除く、出現順）
pub fn referenced_starters(processes: &[Process]) -> Vec<&str> {
    processes
        .iter()
        .filter_map(Process::start_user)
        .unique()
        .collect()
}

/// 各タスクに担当者を添付する
///
/// ディレクトリに存在しない担当者のタスクは `assignee_user` が `None` になる。
pub fn attach_assignees(tasks: &mut [Task], directory: &UserDirectory) {
    for task in tasks {
        task.assignee_user = task.assignee_id().and_then(|id| directory.get(id)).cloned();
    }
}

/// 各プロセスに開始ユーザーを添付する
pub fn attach_starters(processes: &mut [Process], directory: &UserDirectory) {
    for process in processes {
        process.started_by = process
            .start_user()
            .and_then(|id| directory.get(id))
            .cloned();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn user(id: &str, first_name: &str) -> UserInfo {
        UserInfo {
            first_name: first_name.to_string(),
            ..UserInfo::new(id)
        }
    }

    fn task(id: &str, assignee: Option<&str>) -> Task {
        Task {
            assignee: assignee.map(str::to_string),
            ..Task::new(id)
        }
    }

    fn directory() -> UserDirectory {
        UserDirectory::new(vec![user("u1", "Ann"), user("u2", "Bob")])
    }

    #[test]
    fn test_ディレクトリは同じidの最初のユーザーを採用する() {
        let directory = UserDirectory::new(vec![
            user("u1", "Ann"),
            user("u2", "Bob"),
            user("u1", "Impostor"),
        ]);

        assert_eq!(directory.get("u1").unwrap().first_name, "Ann");
        assert_eq!(directory.len(), 3);
    }

    #[test]
    fn test_担当者が存在するタスクにユーザーを添付する() {
        let mut tasks = vec![
            task("t1", Some("u1")),
            task("t2", Some("u2")),
            task("t3", Some("u1")),
        ];

        attach_assignees(&mut tasks, &directory());

        let names: Vec<_> = tasks
            .iter()
            .map(|t| t.assignee_user.as_ref().map(|u| u.first_name.as_str()))
            .collect();
        assert_eq!(names, vec![Some("Ann"), Some("Bob"), Some("Ann")]);
    }

    #[rstest]
    #[case::未割り当て(None)]
    #[case::空文字列(Some(""))]
    #[case::ディレクトリに無い(Some("ghost"))]
    fn test_解決できない担当者は未設定のまま(#[case] assignee: Option<&str>) {
        let mut tasks = vec![task("t1", assignee)];

        attach_assignees(&mut tasks, &directory());

        assert_eq!(tasks[0].assignee_user, None);
    }

    #[test]
    fn test_同じディレクトリで2回補完しても結果は変わらない() {
        let mut tasks = vec![task("t1", Some("u1")), task("t2", Some("ghost"))];

        attach_assignees(&mut tasks, &directory());
        let once = tasks.clone();
        attach_assignees(&mut tasks, &directory());

        assert_eq!(tasks, once);
    }

    #[test]
    fn test_プロセスに開始ユーザーを添付する() {
        let mut processes = vec![
            Process {
                start_user_id: Some("u2".to_string()),
                ..Process::new("p1")
            },
            Process {
                start_user_id: Some(String::new()),
                ..Process::new("p2")
            },
        ];

        attach_starters(&mut processes, &directory());

        assert_eq!(processes[0].started_by, Some(user("u2", "Bob")));
        assert_eq!(processes[1].started_by, None);
    }

    #[test]
    fn test_参照idは重複と空文字列を除いて出現順に並べる() {
        let tasks = vec![
            task("t1", Some("u2")),
            task("t2", Some("")),
            task("t3", None),
            task("t4", Some("u1")),
            task("t5", Some("u2")),
        ];

        assert_eq!(referenced_assignees(&tasks), vec!["u2", "u1"]);
    }

    #[test]
    fn test_開始ユーザーが無ければ参照idは空() {
        let processes = vec![Process::new("p1")];

        assert!(referenced_starters(&processes).is_empty());
    }
}
