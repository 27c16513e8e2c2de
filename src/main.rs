//! threadtest - demonstração do núcleo de threads.
//!
//! Roda hospedado sobre o simulador de interrupções:
//! 1. Inicializa a saída e os flags de trace (`-d <letras>`, `+` liga tudo).
//! 2. Sobe o escalonador com a thread raiz "main".
//! 3. Cria uma thread filha e alterna com ela via `yield_cpu`.
//! 4. A raiz faz join na filha e desliga o escalonador.

use std::sync::Arc;

use bobina::arch::sim::SimulatedInterrupts;
use bobina::core::trace::{self, TraceFlags};
use bobina::mm::HeapStackAllocator;
use bobina::{HaltPolicy, Kernel, Platform, SchedConfig};

/// Iterações de cada thread
const LOOPS: usize = 5;

extern "C" fn simple_thread(kernel: &Kernel, which: usize) {
    for num in 0..LOOPS {
        println!("*** thread {} looped {} times", which, num);
        kernel.yield_cpu();
    }
}

fn parse_debug_flags() {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "-d" {
            let letters = args.next().unwrap_or_else(|| String::from("+"));
            trace::enable(TraceFlags::from_letters(&letters));
        }
    }
}

fn main() {
    bobina::drivers::serial::init();
    parse_debug_flags();

    let interrupts = Arc::new(SimulatedInterrupts::new());
    let platform = Platform::new(interrupts.clone(), Arc::new(HeapStackAllocator::new()));
    let config = SchedConfig::new().with_halt_policy(HaltPolicy::Never);
    let kernel = Kernel::boot(config, platform);

    bobina::kinfo!("(Main) Entering SimpleTest");

    let child = match kernel.create("forked thread") {
        Ok(pid) => pid,
        Err(err) => {
            bobina::kerror!("(Main) create falhou: errno ", err.errno().as_isize() as i64);
            std::process::exit(1);
        }
    };
    if let Err(err) = kernel.fork(child, simple_thread, 1) {
        bobina::kerror!("(Main) fork falhou: errno ", err.errno().as_isize() as i64);
        std::process::exit(1);
    }

    simple_thread(&kernel, 0);

    match kernel.join(child) {
        Ok(code) => println!("forked thread {} exited with {}", child, code),
        Err(err) => println!("join falhou: {}", err),
    }

    kernel.print();
    println!(
        "Ticks: total {}, context switches {}",
        interrupts.ticks(),
        kernel.context_switches()
    );
    kernel.shutdown();
}
