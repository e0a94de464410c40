#![no_main]

use libfuzzer_sys::fuzz_target;
use ufotofu::producer::TestProducer;
use ufotofu_conduit::prelude::*;

fuzz_target!(|data: (TestProducer<u16, u16, u16>, bool)| {
    pollster::block_on(async {
        let (pro, unfolded) = data;

        let items = pro.remaining().to_vec();
        let last = *pro.peek_last().unwrap();

        let result = if unfolded {
            let mut round_tripped = to_stream(from_stream_producer(pro));
            collect(&mut round_tripped)
                .await
                .map(|(items, ())| (items, last.unwrap_or(0)))
        } else {
            let mut round_tripped = to_stream(from_stream(pro));
            collect(&mut round_tripped).await
        };

        match (result, last) {
            (Ok((produced, fin)), Ok(expected_fin)) => {
                assert_eq!(produced, items);
                assert_eq!(fin, expected_fin);
            }
            (Err((produced, err)), Err(expected_err)) => {
                assert_eq!(produced, items);
                assert_eq!(err, expected_err);
            }
            (result, last) => panic!("got {:?}, expected last value {:?}", result, last),
        }
    });
});

/// Collects all items, keeping them around on errors as well.
async fn collect<P: Producer<Item = u16>>(
    pro: &mut P,
) -> Result<(Vec<u16>, P::Final), (Vec<u16>, P::Error)> {
    let mut items = Vec::new();

    loop {
        match pro.produce().await {
            Ok(Left(item)) => items.push(item),
            Ok(Right(fin)) => return Ok((items, fin)),
            Err(err) => return Err((items, err)),
        }
    }
}
