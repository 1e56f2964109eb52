mod indexing;
mod linalg;
mod sparsity;
