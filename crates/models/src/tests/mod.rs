/// Entity round trips and the unique `url` index
pub mod news_tests;
