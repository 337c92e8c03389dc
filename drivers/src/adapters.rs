use evview_types::DvsEvent;

macro_rules! register {
    ($($module:ident),+) => {
        $(
            pub mod $module;
        )+

        paste::paste! {
            pub enum Adapter {
                $(
                    [<$module:camel>]($module::Adapter),
                )+
            }

            $(
                impl From<$module::Adapter> for Adapter {
                    fn from(adapter: $module::Adapter) -> Self {
                        Self::[<$module:camel>](adapter)
                    }
                }
            )+

            impl Adapter {
                pub fn current_t(&self) -> u64 {
                    match self {
                        $(
                            Self::[<$module:camel>](adapter) => adapter.current_t(),
                        )+
                    }
                }

                pub fn convert_into(&mut self, slice: &[u8], events: &mut Vec<DvsEvent<u64, u16, u16>>) {
                    match self {
                        $(
                            Self::[<$module:camel>](adapter) => adapter.convert_into(slice, events),
                        )+
                    }
                }

                pub fn consume(&mut self, slice: &[u8]) {
                    match self {
                        $(
                            Self::[<$module:camel>](adapter) => adapter.consume(slice),
                        )+
                    }
                }
            }
        }
    }
}

register! { evt3 }
