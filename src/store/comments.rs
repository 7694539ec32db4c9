// Comments - notes attached to quotes
//
// Quote deletion does not cascade here: a comment whose quote is gone
// stays in the collection and simply never comes back from
// comments_for_quote. Known, accepted gap in the referential rules.

use super::models::Comment;
use super::AnnotationStore;

impl AnnotationStore {
    pub fn add_comment(&mut self, quote_id: &str, text: &str) -> Comment {
        let comment = Comment::new(quote_id, text);
        self.comments.push(comment.clone());
        comment
    }

    /// Comments for one quote, oldest first
    pub fn comments_for_quote(&self, quote_id: &str) -> Vec<&Comment> {
        let mut list: Vec<&Comment> = self
            .comments
            .iter()
            .filter(|c| c.quote_id == quote_id)
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        list
    }
}
