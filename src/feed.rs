use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::common::lock;

/// One comment under a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub content: String,
}

impl Comment {
    fn new(author: &str, content: &str) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            author: author.to_string(),
            content: content.to_string(),
        }
    }
}

/// One feed entry. `liked` tracks whether the local user has liked
/// it, so a second tap takes the like back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub content: String,
    pub image_url: Option<String>,
    pub likes: u32,
    pub comments: Vec<Comment>,
    pub liked: bool,
}

impl Post {
    fn new(author: &str, content: &str) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            author: author.to_string(),
            content: content.to_string(),
            image_url: None,
            likes: 0,
            comments: Vec::new(),
            liked: false,
        }
    }
}

/// The social feed, newest post first. Kept in memory only; the feed
/// is demo content and resets on every start.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<Mutex<Vec<Post>>>,
}

impl FeedService {
    /// Feed seeded with the fixed demo posts.
    pub fn new() -> Self {
        Self::with_posts(seed_posts())
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Arc::new(Mutex::new(posts)),
        }
    }

    /// Snapshot, newest first.
    pub fn posts(&self) -> Vec<Post> {
        lock(&self.posts).clone()
    }

    /// Prepend a new post. Whitespace-only content is ignored.
    pub fn publish(&self, author: &str, content: &str) -> Option<Post> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        let post = Post::new(author, content);
        lock(&self.posts).insert(0, post.clone());
        Some(post)
    }

    /// Flip the local user's like on a post. Returns false when the
    /// id is unknown.
    pub fn toggle_like(&self, post_id: &str) -> bool {
        let mut posts = lock(&self.posts);
        let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
            return false;
        };
        if post.liked {
            post.likes = post.likes.saturating_sub(1);
        } else {
            post.likes += 1;
        }
        post.liked = !post.liked;
        true
    }

    /// Append a comment. Whitespace-only content is ignored; returns
    /// false when nothing was added.
    pub fn add_comment(&self, post_id: &str, author: &str, content: &str) -> bool {
        let content = content.trim();
        if content.is_empty() {
            return false;
        }
        let mut posts = lock(&self.posts);
        let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
            return false;
        };
        post.comments.push(Comment::new(author, content));
        true
    }
}

impl Default for FeedService {
    fn default() -> Self {
        Self::new()
    }
}

/// The two demo posts every fresh feed starts with.
fn seed_posts() -> Vec<Post> {
    vec![
        Post {
            image_url: Some(
                "https://images.unsplash.com/photo-1560272564-c83b66b1ad12?auto=format&fit=crop&q=80&w=1000"
                    .to_string(),
            ),
            likes: 156,
            comments: vec![
                Comment::new("Maria", "Concordo! Foi espetacular!"),
                Comment::new("Pedro", "Melhor jogo do ano até agora!"),
            ],
            ..Post::new(
                "João Silva",
                "Que jogo incrível ontem! 🏆⚽ O Brasil jogou demais e garantiu mais uma vitória importante nas eliminatórias!",
            )
        },
        Post {
            image_url: Some(
                "https://images.unsplash.com/photo-1517836357463-d25dfeac3438?auto=format&fit=crop&q=80&w=1000"
                    .to_string(),
            ),
            likes: 89,
            comments: vec![
                Comment::new("Carlos", "Arrasou! Continue assim!"),
                Comment::new("Julia", "Você é inspiração! 🏊‍♀️"),
            ],
            ..Post::new(
                "Ana Costa",
                "Treino concluído! 💪 Mais um dia de dedicação na academia. Foco total na preparação para o campeonato estadual de natação!",
            )
        },
    ]
}
