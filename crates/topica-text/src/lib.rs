//! Topica text crate - tokenization, stop words, and TF-IDF term vectors.
//!
//! Turns raw query text into sparse weighted vectors:
//! - Dictionary (jieba) or Unicode word segmentation with stop-word filtering
//! - Batch vocabulary and TF-IDF weighting with pivoted length normalization
//! - Cosine similarity over sparse vectors

pub mod similarity;
pub mod tokenizer;
pub mod vectorizer;

pub use similarity::cosine_similarity;
pub use tokenizer::{tokenize, StopWords, Tokenizer};
pub use vectorizer::{TermVector, TfidfVectorizer, Vocabulary};
