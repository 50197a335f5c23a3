/// Response type for the `Module::call` method.
#[derive(Default, Debug)]
pub struct CallResponse {}
