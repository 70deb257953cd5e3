pub mod matching {
    pub mod match_faces_use_case;
    pub mod match_logger;
}

pub mod reports {
    pub mod domain {
        pub mod candidate_record;
    }
    pub mod infrastructure;
}

pub mod shared {
    pub mod constants;
    pub mod face_image;
    pub mod model_resolver;
}

pub mod verification {
    pub mod domain {
        pub mod face_embedder;
        pub mod face_locator;
        pub mod face_verifier;
    }
    pub mod infrastructure;
}
