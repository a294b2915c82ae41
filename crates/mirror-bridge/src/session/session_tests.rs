use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use super::{Caller, ChannelConfig, Executor, InvokeError, Invoker, SharedCaller};
use crate::instantiate::{Placeholder, PlaceholderInstantiator};
use crate::protocol::frame::{Frame, read_frame, write_frame};
use crate::protocol::{FieldFetch, MethodCall, NewObject, Opcode, Packet};
use crate::registry::{Handle, ObjectRegistry, Role};
use crate::value::{ObjectRef, Value};
use crate::{BridgeError, PROTOCOL_VERSION};

struct World {
    red: ObjectRef,
}

impl World {
    fn new() -> Self {
        Self {
            red: ObjectRef::new("pkg.Color", "RED"),
        }
    }
}

fn counter(obj: Option<&ObjectRef>) -> Result<&Mutex<i64>, InvokeError> {
    obj.and_then(|o| o.downcast_ref::<Mutex<i64>>())
        .ok_or_else(|| InvokeError::new("not a counter"))
}

impl Invoker for World {
    fn invoke(&mut self, call: MethodCall) -> Result<Value, InvokeError> {
        match (call.owner.as_str(), call.method.as_str()) {
            ("pkg.Math", "add") => Ok(Value::Long(
                call.parameters.iter().filter_map(Value::as_i64).sum(),
            )),
            ("pkg.Counter", "increment") => {
                let mut n = counter(call.object.as_ref())?.lock();
                *n += 1;
                Ok(Value::Long(*n))
            }
            ("pkg.Color", "favorite") => Ok(Value::Object(self.red.clone())),
            ("pkg.Echo", "echo") => Ok(call.parameters.into_iter().next().unwrap_or(Value::Null)),
            (owner, method) => Err(InvokeError::new(format!("no method {owner}.{method}"))),
        }
    }

    fn fetch_field(&mut self, fetch: FieldFetch) -> Result<Value, InvokeError> {
        match (fetch.class_name.as_str(), fetch.field.as_str()) {
            ("pkg.Color", "RED") => Ok(Value::Object(self.red.clone())),
            ("pkg.Counter", "count") => {
                let n = *counter(fetch.owner.as_ref().and_then(Value::as_object))?.lock();
                Ok(Value::Long(n))
            }
            (class, field) => Err(InvokeError::new(format!("no field {class}.{field}"))),
        }
    }

    fn construct(&mut self, new: &NewObject) -> Result<ObjectRef, InvokeError> {
        match new.class_name.as_str() {
            "pkg.Counter" | "pkg.TallyCounter" => {
                let start = new.parameters.first().and_then(Value::as_i64).unwrap_or(0);
                Ok(ObjectRef::new(new.class_name.as_str(), Mutex::new(start)))
            }
            other => Err(InvokeError::new(format!("cannot construct {other}"))),
        }
    }
}

fn connect() -> (Caller<UnixStream>, JoinHandle<crate::Result<()>>) {
    let (caller_end, executor_end) = UnixStream::pair().unwrap();
    let executor = thread::spawn(move || -> crate::Result<()> {
        let mut executor = Executor::accept(executor_end, &ChannelConfig::default(), World::new())?;
        executor.serve()
    });
    let caller = Caller::connect(
        caller_end,
        &ChannelConfig::new().read_timeout(Duration::from_secs(5)),
        PlaceholderInstantiator,
    )
    .unwrap();
    (caller, executor)
}

#[test]
fn static_call_round_trip() {
    let (mut caller, executor) = connect();

    let sum = caller
        .call_static("pkg.Math", "add", vec![Value::Int(2), Value::Long(40)])
        .unwrap();

    assert_eq!(sum, Value::Long(42));
    drop(caller.close());
    executor.join().unwrap().unwrap();
}

#[test]
fn tracked_object_is_constructed_remotely() {
    let (mut caller, executor) = connect();
    let proxy = ObjectRef::new("pkg.Counter", ());

    let id = caller
        .track_new(&proxy, "pkg.Counter", vec![Value::Long(5)])
        .unwrap();
    let after = caller
        .call(&proxy, "pkg.Counter", "increment", vec![])
        .unwrap();
    let count = caller.fetch_field(&proxy, "pkg.Counter", "count").unwrap();

    assert_eq!(id, Handle(0));
    assert_eq!(after, Value::Long(6));
    assert_eq!(count, Value::Long(6));
    drop(caller.close());
    executor.join().unwrap().unwrap();
}

#[test]
fn subclass_registers_once_before_reading_inherited_fields() {
    let (mut caller, executor) = connect();
    let tally = ObjectRef::new("pkg.TallyCounter", ());
    let plain = ObjectRef::new("pkg.Counter", ());

    let id = caller
        .track_new(&tally, "pkg.TallyCounter", vec![Value::Long(3)])
        .unwrap();
    let inherited = caller.fetch_field(&tally, "pkg.Counter", "count").unwrap();
    let other = caller.track_new(&plain, "pkg.Counter", vec![]).unwrap();

    assert_eq!(id, Handle(0));
    assert_eq!(inherited, Value::Long(3));
    assert_eq!(other, Handle(1));
    drop(caller.close());
    executor.join().unwrap().unwrap();
}

#[test]
fn remote_objects_arrive_as_stable_placeholders() {
    let (mut caller, executor) = connect();

    let first = caller.fetch_static_field("pkg.Color", "RED").unwrap();
    let second = caller.call_static("pkg.Color", "favorite", vec![]).unwrap();

    let red = first.as_object().unwrap();
    assert!(red.downcast_ref::<Placeholder>().is_some());
    assert!(second.as_object().unwrap().ptr_eq(red));
    assert_eq!(caller.registry().handle_of(red), Some(Handle(1 << 63)));
    drop(caller.close());
    executor.join().unwrap().unwrap();
}

#[test]
fn static_field_binds_local_proxy() {
    let (mut caller, executor) = connect();
    let red = ObjectRef::new("pkg.Color", ());

    let handle = caller.bind_static_field(&red, "pkg.Color", "RED").unwrap();
    let favorite = caller.call_static("pkg.Color", "favorite", vec![]).unwrap();

    assert_eq!(handle, Handle(1 << 63));
    assert!(favorite.as_object().unwrap().ptr_eq(&red));
    drop(caller.close());
    executor.join().unwrap().unwrap();
}

#[test]
fn local_object_passed_as_argument_comes_back_as_itself() {
    let (mut caller, executor) = connect();
    let local = ObjectRef::new("pkg.Listener", ());

    let echoed = caller
        .call_static("pkg.Echo", "echo", vec![Value::Object(local.clone())])
        .unwrap();

    assert!(echoed.as_object().unwrap().ptr_eq(&local));
    drop(caller.close());
    executor.join().unwrap().unwrap();
}

#[test]
fn failed_invocation_tears_down_the_channel() {
    let (mut caller, executor) = connect();

    let err = caller.call_static("pkg.Math", "divide", vec![]).unwrap_err();

    assert!(matches!(err, BridgeError::Closed), "{err:?}");
    let served = executor.join().unwrap().unwrap_err();
    assert_eq!(served.to_string(), "invocation failed: no method pkg.Math.divide");
}

#[test]
fn version_mismatch_aborts_setup() {
    let (caller_end, mut executor_end) = UnixStream::pair().unwrap();
    executor_end.write_all(&[PROTOCOL_VERSION + 1]).unwrap();

    let err = Caller::connect(caller_end, &ChannelConfig::default(), PlaceholderInstantiator)
        .err()
        .unwrap();

    assert!(matches!(
        err,
        BridgeError::VersionMismatch {
            expected: PROTOCOL_VERSION,
            ..
        }
    ));
}

#[test]
fn executor_announces_version() {
    let (mut caller_end, executor_end) = UnixStream::pair().unwrap();

    let _executor = Executor::accept(executor_end, &ChannelConfig::default(), World::new()).unwrap();

    let mut version = [0_u8; 1];
    caller_end.read_exact(&mut version).unwrap();
    assert_eq!(version[0], PROTOCOL_VERSION);
}

#[test]
fn missing_response_times_out() {
    let (caller_end, mut silent_end) = UnixStream::pair().unwrap();
    silent_end.write_all(&[PROTOCOL_VERSION]).unwrap();
    let config = ChannelConfig::new().read_timeout(Duration::from_millis(50));
    let mut caller = Caller::connect(caller_end, &config, PlaceholderInstantiator).unwrap();

    let err = caller.call_static("pkg.Math", "add", vec![]).unwrap_err();

    assert!(matches!(err, BridgeError::Timeout), "{err:?}");
    drop(silent_end);
}

#[test]
fn late_response_is_never_paired_with_the_next_call() {
    let (caller_end, mut slow_end) = UnixStream::pair().unwrap();
    let slow = thread::spawn(move || {
        slow_end.write_all(&[PROTOCOL_VERSION]).unwrap();
        let mut registry = ObjectRegistry::new(Role::Executor);
        for answer in [111_i64, 222] {
            if read_frame(&mut slow_end).unwrap().is_none() {
                return;
            }
            if answer == 111 {
                thread::sleep(Duration::from_millis(200));
            }
            let reply = Packet::MethodReturn(Value::Long(answer))
                .encode(&mut registry)
                .unwrap();
            if write_frame(&mut slow_end, &reply).is_err() {
                return;
            }
        }
    });
    let config = ChannelConfig::new().read_timeout(Duration::from_millis(50));
    let mut caller = Caller::connect(caller_end, &config, PlaceholderInstantiator).unwrap();

    let first = caller.call_static("pkg.Math", "add", vec![]).unwrap_err();
    thread::sleep(Duration::from_millis(300));
    let second = caller.call_static("pkg.Math", "add", vec![]).unwrap_err();

    assert!(matches!(first, BridgeError::Timeout), "{first:?}");
    assert!(matches!(second, BridgeError::Closed), "{second:?}");
    assert!(caller.is_broken());
    drop(caller.close());
    slow.join().unwrap();
}

#[test]
fn unsent_construction_releases_its_handle() {
    let (mut caller, executor) = connect();
    let proxy = ObjectRef::new("pkg.Counter", ());

    let err = caller
        .track_new(&proxy, "pkg.Counter", vec![Value::Double(f64::NAN)])
        .unwrap_err();

    assert!(matches!(err, BridgeError::Codec(_)), "{err:?}");
    assert!(!caller.is_broken());
    assert_eq!(caller.registry().handle_of(&proxy), None);
    let id = caller.track_new(&proxy, "pkg.Counter", vec![]).unwrap();
    assert_eq!(id, Handle(0));
    drop(caller.close());
    executor.join().unwrap().unwrap();
}

#[test]
fn executor_rejects_stray_return() {
    let (mut caller_end, executor_end) = UnixStream::pair().unwrap();
    let mut executor = Executor::accept(executor_end, &ChannelConfig::default(), World::new()).unwrap();
    let mut version = [0_u8; 1];
    caller_end.read_exact(&mut version).unwrap();

    write_frame(
        &mut caller_end,
        &Frame::new(Opcode::MethodReturn, r#"{"type":"null"}"#),
    )
    .unwrap();
    let err = executor.serve_one().unwrap_err();

    assert!(matches!(
        err,
        BridgeError::UnexpectedPacket {
            received: Opcode::MethodReturn,
            ..
        }
    ));
}

#[test]
fn unknown_opcode_from_caller_is_fatal() {
    let (mut caller_end, executor_end) = UnixStream::pair().unwrap();
    let mut executor = Executor::accept(executor_end, &ChannelConfig::default(), World::new()).unwrap();

    caller_end.write_all(&[0, 42, 0, 0]).unwrap();
    let err = executor.serve_one().unwrap_err();

    assert_eq!(err.to_string(), "unknown opcode 42");
}

#[test]
fn shared_caller_pairs_requests_with_responses() {
    let (caller, executor) = connect();
    let shared = SharedCaller::new(caller);

    let workers: Vec<_> = (0..4_i64)
        .map(|worker| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..10_i64 {
                    let sum = shared
                        .call_static("pkg.Math", "add", vec![Value::Long(worker * 100), Value::Long(i)])
                        .unwrap();
                    assert_eq!(sum, Value::Long(worker * 100 + i));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    drop(shared);
    executor.join().unwrap().unwrap();
}
