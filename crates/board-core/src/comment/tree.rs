//! Comment thread assembly
//!
//! Turns the flat comment list of an article into a reply tree. Roots are
//! ordered newest first, replies oldest first; ties fall back to the id.
//! Traversal only ever walks down from the roots through an id index, so a
//! self-parent or a parent cycle can never make it loop.

use super::model::{Comment, CommentNode};
use crate::error::{BoardError, Result};
use crate::types::CommentId;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use tracing::warn;

/// Assembled thread plus the comments that could not be placed
#[derive(Debug, Default)]
pub struct CommentThread {
    /// Top-level comments with their replies nested inside
    pub roots: Vec<CommentNode>,
    /// One entry per comment that was excluded together with its replies
    pub excluded: Vec<BoardError>,
}

impl CommentThread {
    pub fn is_complete(&self) -> bool {
        self.excluded.is_empty()
    }

    /// Total number of comments placed in the tree
    pub fn comment_count(&self) -> usize {
        self.roots.iter().map(|root| 1 + root.reply_count()).sum()
    }
}

/// Builds ordered reply trees from flat comments
pub struct CommentTreeBuilder;

impl CommentTreeBuilder {
    /// Build the tree, failing on the first comment that cannot be placed
    pub fn build(comments: impl IntoIterator<Item = Comment>) -> Result<Vec<CommentNode>> {
        let mut thread = Self::assemble(comments);
        if thread.excluded.is_empty() {
            Ok(thread.roots)
        } else {
            Err(thread.excluded.swap_remove(0))
        }
    }

    /// Build the tree, leaving out comments that cannot be placed.
    ///
    /// A reply to a missing parent, to a comment of another article, or one
    /// caught in a parent cycle is excluded with its whole subtree and
    /// reported in [`CommentThread::excluded`].
    pub fn assemble(comments: impl IntoIterator<Item = Comment>) -> CommentThread {
        let mut comments: Vec<Comment> = comments.into_iter().collect();
        comments.sort_by_key(|c| c.id);
        comments.dedup_by_key(|c| c.id);

        let index: HashMap<CommentId, usize> = comments
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();

        let mut roots = Vec::new();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
        let mut excluded = Vec::new();
        let mut rejected = Vec::new();

        for (i, comment) in comments.iter().enumerate() {
            let Some(parent_id) = comment.parent_comment_id else {
                roots.push(i);
                continue;
            };

            match index.get(&parent_id) {
                Some(&p) if comments[p].article_id != comment.article_id => {
                    excluded.push(BoardError::CrossArticleParent {
                        comment_id: comment.id,
                        parent_id,
                    });
                    rejected.push(i);
                }
                Some(&p) => children[p].push(i),
                None => {
                    excluded.push(BoardError::DanglingParentReference {
                        comment_id: comment.id,
                        parent_id,
                    });
                    rejected.push(i);
                }
            }
        }

        let placed = Self::reachable(&roots, &children, comments.len());
        let dropped = Self::reachable(&rejected, &children, comments.len());

        // Anything neither placed nor below a rejected comment is on a cycle or
        // hangs below one; only the cycle members are reported
        let unplaced: Vec<bool> = (0..comments.len())
            .map(|i| placed[i].is_none() && dropped[i].is_none())
            .collect();
        for i in Self::cycle_members(&comments, &index, &unplaced) {
            excluded.push(BoardError::CommentCycle {
                comment_id: comments[i].id,
            });
        }

        for problem in &excluded {
            warn!("Excluding comment from thread: {}", problem);
        }

        let roots = Self::materialize(comments, &roots, &children, &placed);

        CommentThread { roots, excluded }
    }

    /// Breadth-first visit order of everything reachable from `starts`,
    /// as a per-comment position (None when unreachable)
    fn reachable(starts: &[usize], children: &[Vec<usize>], len: usize) -> Vec<Option<usize>> {
        let mut order = vec![None; len];
        let mut queue: VecDeque<usize> = starts.iter().copied().collect();
        let mut position = 0;

        while let Some(i) = queue.pop_front() {
            if order[i].is_some() {
                continue;
            }
            order[i] = Some(position);
            position += 1;
            queue.extend(children[i].iter().copied());
        }

        order
    }

    /// Comments lying on a parent cycle, in id order.
    ///
    /// Parent links of unplaced comments only lead to other unplaced
    /// comments, so every parent walk among them ends on a cycle.
    fn cycle_members(
        comments: &[Comment],
        index: &HashMap<CommentId, usize>,
        unplaced: &[bool],
    ) -> Vec<usize> {
        const UNSEEN: u8 = 0;
        const ON_WALK: u8 = 1;
        const DONE: u8 = 2;

        let parent = |i: usize| {
            comments[i]
                .parent_comment_id
                .and_then(|p| index.get(&p).copied())
                .filter(|&p| unplaced[p])
        };

        let mut mark = vec![UNSEEN; comments.len()];
        let mut on_cycle = vec![false; comments.len()];

        for start in (0..comments.len()).filter(|&i| unplaced[i]) {
            let mut path = Vec::new();
            let mut current = Some(start);

            while let Some(i) = current {
                match mark[i] {
                    UNSEEN => {
                        mark[i] = ON_WALK;
                        path.push(i);
                        current = parent(i);
                    }
                    ON_WALK => {
                        if let Some(pos) = path.iter().position(|&p| p == i) {
                            for &member in &path[pos..] {
                                on_cycle[member] = true;
                            }
                        }
                        break;
                    }
                    _ => break,
                }
            }

            for i in path {
                mark[i] = DONE;
            }
        }

        (0..comments.len()).filter(|&i| on_cycle[i]).collect()
    }

    /// Build nodes bottom-up in reverse visit order so every child is ready
    /// before its parent, without recursion
    fn materialize(
        comments: Vec<Comment>,
        roots: &[usize],
        children: &[Vec<usize>],
        placed: &[Option<usize>],
    ) -> Vec<CommentNode> {
        let mut visit: Vec<usize> = (0..comments.len()).filter(|&i| placed[i].is_some()).collect();
        visit.sort_by_key(|&i| placed[i]);

        let mut pending: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
        let mut built: Vec<Option<CommentNode>> = vec![None; pending.len()];

        for &i in visit.iter().rev() {
            let Some(comment) = pending[i].take() else {
                continue;
            };
            let mut node = CommentNode::new(comment);
            node.children = children[i]
                .iter()
                .filter_map(|&c| built[c].take())
                .collect();
            node.children.sort_by(reply_order);
            built[i] = Some(node);
        }

        let mut top: Vec<CommentNode> = roots.iter().filter_map(|&r| built[r].take()).collect();
        top.sort_by(root_order);
        top
    }
}

/// Replies: oldest first, then by id
fn reply_order(a: &CommentNode, b: &CommentNode) -> Ordering {
    a.comment
        .created_at()
        .cmp(&b.comment.created_at())
        .then_with(|| a.id().cmp(&b.id()))
}

/// Top-level comments: newest first, then by id
fn root_order(a: &CommentNode, b: &CommentNode) -> Ordering {
    b.comment
        .created_at()
        .cmp(&a.comment.created_at())
        .then_with(|| a.id().cmp(&b.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArticleId, AuditInfo, Author, UserId};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn comment(id: u64, parent: Option<u64>, t: i64) -> Comment {
        comment_on(1, id, parent, t)
    }

    fn comment_on(article: u64, id: u64, parent: Option<u64>, t: i64) -> Comment {
        let alice = UserId::new("alice").unwrap();
        Comment {
            id: CommentId(id),
            article_id: ArticleId(article),
            parent_comment_id: parent.map(CommentId),
            content: format!("comment {}", id),
            author: Author::new(alice.clone()),
            audit: AuditInfo::created(&alice, Utc.timestamp_opt(t, 0).unwrap()),
        }
    }

    fn ids(nodes: &[CommentNode]) -> Vec<u64> {
        nodes.iter().map(|n| n.id().0).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(CommentTreeBuilder::build(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_roots_newest_first_with_nested_reply() {
        let roots = CommentTreeBuilder::build(vec![
            comment(1, None, 10),
            comment(2, Some(1), 20),
            comment(3, None, 5),
        ])
        .unwrap();

        assert_eq!(ids(&roots), vec![1, 3]);
        assert_eq!(ids(&roots[0].children), vec![2]);
        assert!(roots[1].children.is_empty());
    }

    #[test]
    fn test_replies_oldest_first_ties_by_id() {
        let roots = CommentTreeBuilder::build(vec![
            comment(1, None, 0),
            comment(5, Some(1), 30),
            comment(4, Some(1), 20),
            comment(3, Some(1), 20),
        ])
        .unwrap();

        assert_eq!(ids(&roots[0].children), vec![3, 4, 5]);
    }

    #[test]
    fn test_roots_ties_by_id_ascending() {
        let roots = CommentTreeBuilder::build(vec![
            comment(9, None, 10),
            comment(2, None, 10),
            comment(4, None, 50),
        ])
        .unwrap();

        assert_eq!(ids(&roots), vec![4, 2, 9]);
    }

    #[test]
    fn test_input_order_is_irrelevant() {
        let forward = vec![
            comment(1, None, 10),
            comment(2, Some(1), 20),
            comment(3, Some(2), 30),
            comment(4, None, 40),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(
            CommentTreeBuilder::build(forward).unwrap(),
            CommentTreeBuilder::build(backward).unwrap()
        );
    }

    #[test]
    fn test_deep_thread_without_recursion() {
        let mut comments = vec![comment(1, None, 0)];
        for id in 2..=20_000u64 {
            comments.push(comment(id, Some(id - 1), id as i64));
        }

        let thread = CommentTreeBuilder::assemble(comments);
        assert!(thread.is_complete());
        assert_eq!(thread.roots.len(), 1);
        assert_eq!(thread.comment_count(), 20_000);
    }

    #[test]
    fn test_dangling_parent_is_an_error() {
        let result = CommentTreeBuilder::build(vec![comment(1, None, 0), comment(2, Some(99), 1)]);
        assert!(matches!(
            result,
            Err(BoardError::DanglingParentReference {
                comment_id: CommentId(2),
                parent_id: CommentId(99)
            })
        ));
    }

    #[test]
    fn test_dangling_parent_excluded_with_subtree() {
        let thread = CommentTreeBuilder::assemble(vec![
            comment(1, None, 0),
            comment(2, Some(99), 1),
            comment(3, Some(2), 2),
        ]);

        assert_eq!(ids(&thread.roots), vec![1]);
        assert_eq!(thread.excluded.len(), 1);
        assert_eq!(thread.comment_count(), 1);
    }

    #[test]
    fn test_self_parent_terminates() {
        let thread = CommentTreeBuilder::assemble(vec![comment(1, None, 0), comment(2, Some(2), 1)]);

        assert_eq!(ids(&thread.roots), vec![1]);
        assert!(matches!(
            thread.excluded.as_slice(),
            [BoardError::CommentCycle {
                comment_id: CommentId(2)
            }]
        ));
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let thread = CommentTreeBuilder::assemble(vec![
            comment(1, Some(2), 0),
            comment(2, Some(1), 1),
            comment(3, None, 2),
        ]);

        assert_eq!(ids(&thread.roots), vec![3]);
        assert_eq!(thread.excluded.len(), 2);
    }

    #[test]
    fn test_reply_below_cycle_is_not_a_cycle_member() {
        let thread = CommentTreeBuilder::assemble(vec![
            comment(1, Some(2), 0),
            comment(2, Some(1), 1),
            comment(3, Some(1), 2),
            comment(4, Some(3), 3),
            comment(5, None, 4),
        ]);

        assert_eq!(ids(&thread.roots), vec![5]);
        assert_eq!(thread.comment_count(), 1);
        let reported: Vec<CommentId> = thread
            .excluded
            .iter()
            .map(|e| match e {
                BoardError::CommentCycle { comment_id } => *comment_id,
                other => panic!("unexpected exclusion: {}", other),
            })
            .collect();
        assert_eq!(reported, vec![CommentId(1), CommentId(2)]);
    }

    #[test]
    fn test_cross_article_parent_excluded() {
        let thread = CommentTreeBuilder::assemble(vec![
            comment_on(1, 1, None, 0),
            comment_on(2, 2, Some(1), 1),
        ]);

        assert_eq!(ids(&thread.roots), vec![1]);
        assert!(matches!(
            thread.excluded.as_slice(),
            [BoardError::CrossArticleParent { .. }]
        ));
    }

    #[test]
    fn test_duplicate_ids_collapse() {
        let roots =
            CommentTreeBuilder::build(vec![comment(1, None, 0), comment(1, None, 0)]).unwrap();
        assert_eq!(roots.len(), 1);
    }
}
