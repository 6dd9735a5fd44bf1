pub mod seaorm;

pub use seaorm::SeaOrmNewsRepository;
