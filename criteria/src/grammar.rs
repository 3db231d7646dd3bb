use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "criteria.pest"]
pub struct CriteriaParser;
