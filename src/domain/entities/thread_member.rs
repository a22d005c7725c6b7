//! Thread member part, keyed by the member's `user_id`.

use crate::domain::part::PartKind;
use crate::infrastructure::http::{routes, Endpoints, Operation};

pub struct ThreadMember;

impl PartKind for ThreadMember {
    const NAME: &'static str = "ThreadMember";
    const DISCRIMINATOR: &'static str = "user_id";
    // `id` is the thread's id, not the member's
    const FILLABLE: &'static [&'static str] = &["id", "join_timestamp", "flags"];
    type Relations = ();
}

impl ThreadMember {
    /// Endpoints of a thread's member repository (`vars` carry `thread_id`).
    pub fn endpoints() -> Endpoints {
        Endpoints::new()
            .with(Operation::All, routes::THREAD_MEMBERS)
            .with(Operation::Get, routes::THREAD_MEMBER)
            .with(Operation::Delete, routes::THREAD_MEMBER)
    }
}
