mod covering;
mod parser;
mod trivia;
