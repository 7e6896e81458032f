// Generates one test per function, each running the function against a
// fresh trie for every stride length. The functions take the trie and
// return `Result<(), Box<dyn std::error::Error>>`.
#[macro_export]
#[doc(hidden)]
macro_rules! all_strides {
    ( $( $fn_name: ident; $test_name: ident; $ty: ty ), * ) => {

        $(
            #[test]
            fn $fn_name() -> Result<(), Box<dyn std::error::Error>> {
                for stride in $crate::Stride::ALL {
                    println!("stride length {} starting...", stride);
                    let trie = $crate::MultiBitTrie::<$ty>::new(stride);
                    $test_name(trie)?;
                }
                Ok(())
            }
        )*
    };
}
