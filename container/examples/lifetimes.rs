use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use trellis_container::{Concrete, Container, Error};

// A service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn tracker() -> Concrete {
  Concrete::factory(|_, _| {
    Ok(RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    })
  })
}

fn main() -> Result<(), Error> {
  let container = Container::new();

  // Built once, then served from the instance cache.
  container.singleton("singleton_tracker", tracker());
  // Built on every make.
  container.bind("transient_tracker", tracker(), false);

  println!("--- Resolving Singletons ---");
  let s1 = container.make_as::<RequestTracker>("singleton_tracker")?;
  let s2 = container.make_as::<RequestTracker>("singleton_tracker")?;
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert!(Arc::ptr_eq(&s1, &s2));

  println!("--- Resolving Transients ---");
  let t1 = container.make_as::<RequestTracker>("transient_tracker")?;
  let t2 = container.make_as::<RequestTracker>("transient_tracker")?;
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert_ne!(t1.id, t2.id);

  println!("--- Missing Bindings ---");
  match container.make("unknown") {
    Err(err) => println!("{err}"),
    Ok(_) => unreachable!("nothing is bound under 'unknown'"),
  }

  container.flush();
  assert!(!container.bound("singleton_tracker"));
  Ok(())
}
