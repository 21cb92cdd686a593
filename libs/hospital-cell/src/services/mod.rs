pub mod department;
pub mod hospital;
