pub mod extract;
pub mod feeds;
pub mod health;
pub mod likes;
pub mod parent;
pub mod playlists;
pub mod shared;
pub mod videos;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .service(
                web::scope("/parent")
                    .configure(parent::configure)
                    .configure(playlists::configure)
                    .configure(videos::configure)
                    .configure(likes::configure),
            )
            .service(web::scope("/kid").configure(feeds::configure)),
    );
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::web;
    use std::sync::Arc;

    use crate::config::FeedConfig;
    use crate::services::feed::FeedRegistry;
    use crate::services::parent_gate::ParentGate;
    use crate::store::{MemoryStore, Store};

    pub const PIN: &str = "2468";

    pub struct TestState {
        pub memory: Arc<MemoryStore>,
        pub store: web::Data<dyn Store>,
        pub feeds: web::Data<FeedRegistry>,
        pub gate: web::Data<ParentGate>,
    }

    pub fn state() -> TestState {
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn Store> = memory.clone();
        TestState {
            memory,
            store: web::Data::from(store),
            feeds: web::Data::new(FeedRegistry::new(FeedConfig::default())),
            gate: web::Data::new(ParentGate::new(PIN)),
        }
    }
}
