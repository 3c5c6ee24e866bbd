#![no_std]
#![no_main]
#![deny(unused_must_use)]

use core::fmt::Write as _;

use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex, signal::Signal, watch::Watch,
};
use embassy_time::{Delay, Duration, Ticker, Timer};
use embedded_graphics::{
    mono_font::{ascii, MonoTextStyle, MonoTextStyleBuilder},
    pixelcolor::BinaryColor,
    prelude::Point,
    primitives::{PrimitiveStyleBuilder, StyledDrawable},
    text::Text,
    Drawable,
};
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    gpio::{Input, InputConfig, Pull},
    i2c::master::I2c,
    time::Rate,
    timer::systimer::SystemTimer,
    Async,
};
use esp_println::println;
use heapless::String;
use imu_orientation::{
    clock::SystemClock,
    config::EstimatorConfig,
    gizmo::OrientationGizmo,
    mpu6050::{AccelRange, GyroRange, Mpu6050},
    Orientation, OrientationEstimator, SensorSample,
};
use log::{error, info};
use ssd1306::{
    mode::{BasicMode, DisplayConfigAsync},
    prelude::I2CInterface,
    I2CDisplayInterface,
};
use static_cell::StaticCell;

type I2cBus = I2c<'static, Async>;
type I2cDev = I2cDevice<'static, CriticalSectionRawMutex, I2cBus>;

type DisplaySize = ssd1306::size::DisplaySize128x64;
type Display = ssd1306::Ssd1306Async<I2CInterface<I2cDev>, DisplaySize, BasicMode>;

static IMU: Watch<CriticalSectionRawMutex, ImuData, 2> = Watch::new();
static CALIBRATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Fixed control loop period. The gyro low-pass is tuned for this rate.
const TICK_PERIOD: Duration = Duration::from_millis(10);

const GIZMO_CENTER: Point = Point::new(96, 32);
const GIZMO_RADIUS: u32 = 28;

#[derive(Clone, Copy)]
struct ImuData {
    sample: SensorSample,
    orientation: Orientation,
}

#[embassy_executor::task]
async fn imu_task(mut imu: Mpu6050<I2cDev>) {
    if let Err(err) = imu.init(&mut Delay).await {
        error!("MPU6050 init failed: {err:?}");
        return;
    }
    match imu.get_temp().await {
        Ok(temp) => info!("MPU6050 die temp: {temp}C"),
        Err(err) => error!("MPU6050 temp read failed: {err:?}"),
    }

    let mut estimator = OrientationEstimator::new(SystemClock, EstimatorConfig::default());
    let imu_sender = IMU.sender();
    let mut ticker = Ticker::every(TICK_PERIOD);

    loop {
        // Tare runs between ticks, never inside one
        if CALIBRATE.try_take().is_some() {
            estimator.calibrate();
            info!("Orientation tared");
        }

        let orientation = estimator.tick(&mut imu).await;
        imu_sender.send(ImuData {
            sample: *estimator.last_sample(),
            orientation,
        });

        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn button_task(mut button: Input<'static>) {
    loop {
        button.wait_for_falling_edge().await;
        CALIBRATE.signal(());
        // Debounce
        Timer::after_millis(250).await;
    }
}

fn text_line(
    text: &str,
    y: i32,
    style: MonoTextStyle<'static, BinaryColor>,
) -> Text<'_, MonoTextStyle<'static, BinaryColor>> {
    Text::new(text, Point::new(0, y), style)
}

#[embassy_executor::task]
async fn ui_task(display: Display) {
    let mut imu_rcv = IMU.receiver().unwrap();

    let mut display = display.into_buffered_graphics_mode();
    display.init().await.unwrap();
    display.clear_buffer();
    display.flush().await.unwrap();
    display.set_display_on(true).await.unwrap();

    let stroke_style = PrimitiveStyleBuilder::new()
        .stroke_color(BinaryColor::On)
        .stroke_width(1)
        .build();
    let font_style = MonoTextStyleBuilder::new()
        .text_color(BinaryColor::On)
        .font(&ascii::FONT_5X8)
        .build();
    let label_style = MonoTextStyleBuilder::new()
        .text_color(BinaryColor::On)
        .font(&ascii::FONT_4X6)
        .build();

    let mut line: String<32> = String::new();

    loop {
        let ImuData {
            sample,
            orientation,
        } = imu_rcv.changed().await;

        display.clear_buffer();

        let gizmo = OrientationGizmo::new(GIZMO_CENTER, GIZMO_RADIUS)
            .oriented(orientation)
            .with_accel(sample.accel);

        gizmo.draw_styled(&stroke_style, &mut display).unwrap();

        for (label, position) in gizmo.cardinals() {
            Text::new(label, position, label_style)
                .draw(&mut display)
                .unwrap();
        }
        for (axis, edge) in gizmo.axes() {
            Text::new(axis.label(), edge.end, font_style)
                .draw(&mut display)
                .unwrap();
        }

        // Accelerometer as fed to fusion, flagged when the read failed
        let header = if sample.accel_ok { "RAW ACC" } else { "ACC FAIL" };
        text_line(header, 7, font_style).draw(&mut display).unwrap();

        let rows = [
            ("x", sample.accel.x),
            ("y", sample.accel.y),
            ("z", sample.accel.z),
        ];
        for (row, (name, value)) in rows.into_iter().enumerate() {
            line.clear();
            write!(line, "{name}:{value:+.2}").unwrap();
            text_line(&line, 15 + 8 * row as i32, font_style)
                .draw(&mut display)
                .unwrap();
        }

        text_line("RPY DEG", 41, font_style).draw(&mut display).unwrap();
        line.clear();
        write!(
            line,
            "{:.0} {:.0} {:.0}",
            orientation.roll, orientation.pitch, orientation.yaw
        )
        .unwrap();
        text_line(&line, 49, font_style).draw(&mut display).unwrap();

        display.flush().await.unwrap();
    }
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let systimer = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(systimer.alarm0);

    let i2c = I2c::new(
        peripherals.I2C0,
        esp_hal::i2c::master::Config::default().with_frequency(Rate::from_khz(400)),
    )
    .unwrap()
    .into_async()
    .with_scl(peripherals.GPIO21)
    .with_sda(peripherals.GPIO20);

    static I2C_BUS: StaticCell<Mutex<CriticalSectionRawMutex, I2cBus>> = StaticCell::new();
    let i2c_bus = I2C_BUS.init(Mutex::new(i2c));

    let imu = Mpu6050::new(I2cDevice::new(i2c_bus))
        .with_accel_range(AccelRange::G2)
        .with_gyro_range(GyroRange::D250);

    let di = I2CDisplayInterface::new(I2cDevice::new(i2c_bus));
    let display = ssd1306::Ssd1306Async::new(
        di,
        ssd1306::size::DisplaySize128x64,
        ssd1306::rotation::DisplayRotation::Rotate0,
    );

    // BOOT button, active low
    let button = Input::new(
        peripherals.GPIO9,
        InputConfig::default().with_pull(Pull::Up),
    );

    spawner.must_spawn(imu_task(imu));
    spawner.must_spawn(ui_task(display));
    spawner.must_spawn(button_task(button));

    println!("Tasks spawned, press BOOT to tare");

    loop {
        Timer::after_secs(10000).await;
    }
}
