use jsdoc::Code;

#[test]
fn parsing_leaves_the_global_subscriber_to_the_caller() {
  let docs = jsdoc::parse("/** a */ x").unwrap();
  assert_eq!(docs.len(), 1);
  assert!(!docs[0].code.is_nop());
  assert!(matches!(docs[0].code, Code::Assignment(_)));
  assert!(tracing_subscriber::fmt().try_init().is_ok());
}
