pub mod assemble;
pub mod run;
pub mod status;
pub mod topic;
