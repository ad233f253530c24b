use super::{arity, int_arg, RunContext, ShimError};
use crate::value::{shared, Shared, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `new Random()` draws its seed from the run's generator, so a seeded run
/// stays reproducible; `new Random(seed)` is deterministic on its own.
pub fn new_random(ctx: &mut RunContext, args: &[Value]) -> Result<Value, ShimError> {
    arity("Random", args, 0..=1)?;
    let seed = match args.first() {
        Some(seed) => int_arg("Random", seed)? as u64,
        None => ctx.rng.gen(),
    };
    Ok(Value::Random(shared(StdRng::seed_from_u64(seed))))
}

pub fn random_method(rng: &Shared<StdRng>, method: &str, args: &[Value]) -> Result<Value, ShimError> {
    let mut rng = rng.borrow_mut();
    match method {
        "nextInt" => {
            arity("nextInt", args, 0..=1)?;
            match args.first() {
                None => Ok(Value::Int(rng.gen::<i32>() as i64)),
                Some(bound) => {
                    let bound = int_arg("nextInt", bound)?;
                    if bound <= 0 {
                        return Err(ShimError::IllegalArgument("bound must be positive".to_string()));
                    }
                    Ok(Value::Int(rng.gen_range(0..bound)))
                }
            }
        }
        "nextDouble" => {
            arity("nextDouble", args, 0..=0)?;
            Ok(Value::Double(rng.gen::<f64>()))
        }
        "nextBoolean" => {
            arity("nextBoolean", args, 0..=0)?;
            Ok(Value::Bool(rng.gen::<bool>()))
        }
        _ => Err(ShimError::unknown_method("Random", method)),
    }
}
