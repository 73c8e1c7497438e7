use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use rust_decimal_macros::dec;

use plategrid_core::{CancelToken, CustomerId, Money, ProductId};
use plategrid_fulfillment::{
    CreateOrderInput, DeliveryService, KitchenService, OrderItemInput, OrderService, PaymentService,
};
use plategrid_infra::{
    InMemoryCourierRepository, InMemoryDeliveryRepository, InMemoryOrderRepository,
    InMemoryPaymentRepository, InMemoryTicketRepository,
};
use plategrid_orders::{DeliveryAddress, Order, Topping};
use plategrid_treasury::PaymentMethod;

fn bench_address() -> DeliveryAddress {
    DeliveryAddress {
        city: "Lisbon".to_string(),
        street: "Rua Augusta".to_string(),
        house: "25".to_string(),
        apartment: String::new(),
        floor: String::new(),
        comment: String::new(),
    }
}

fn pizza_line() -> OrderItemInput {
    OrderItemInput {
        product_id: ProductId::new(),
        name: "Pizza Margherita".to_string(),
        quantity: 2,
        base_price: Money::new(dec!(9.50)),
        size_multiplier: dec!(1.5),
        toppings: vec![
            Topping {
                name: "extra mozzarella".to_string(),
                price: Money::new(dec!(1.20)),
            },
            Topping {
                name: "basil".to_string(),
                price: Money::new(dec!(0.60)),
            },
        ],
    }
}

struct Stores {
    orders: InMemoryOrderRepository,
    payments: InMemoryPaymentRepository,
    tickets: InMemoryTicketRepository,
    deliveries: InMemoryDeliveryRepository,
    couriers: InMemoryCourierRepository,
}

fn setup_stores() -> Stores {
    Stores {
        orders: InMemoryOrderRepository::new(),
        payments: InMemoryPaymentRepository::new(),
        tickets: InMemoryTicketRepository::new(),
        deliveries: InMemoryDeliveryRepository::new(),
        couriers: InMemoryCourierRepository::new(),
    }
}

fn bench_order_pricing(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_pricing");

    // Every appended line reprices the whole order, so the cost of one
    // append grows with the number of lines already on it.
    for line_count in [1, 10, 100].iter() {
        group.throughput(Throughput::Elements(*line_count as u64));
        group.bench_with_input(
            BenchmarkId::new("reprice_on_line_append", line_count),
            line_count,
            |b, &count| {
                let mut template = Order::create(CustomerId::new(), bench_address());
                for _ in 0..count {
                    let item = pizza_line();
                    template
                        .add_item(
                            item.product_id,
                            item.name,
                            item.quantity,
                            item.base_price,
                            item.size_multiplier,
                            item.toppings,
                        )
                        .unwrap();
                }
                let extra = pizza_line();

                b.iter(|| {
                    let mut order = template.clone();
                    let item = extra.clone();
                    order
                        .add_item(
                            item.product_id,
                            item.name,
                            item.quantity,
                            item.base_price,
                            item.size_multiplier,
                            item.toppings,
                        )
                        .unwrap();
                    black_box(order.final_price());
                });
            },
        );
    }

    group.finish();
}

fn bench_saga_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("saga_dispatch");
    group.sample_size(1000);

    // Benchmark: checkout only (order + payment)
    group.bench_function("order_to_paid", |b| {
        let stores = setup_stores();
        let orders = OrderService::new(stores.orders.clone());
        let payments = PaymentService::new(stores.payments.clone(), stores.orders.clone());
        let cancel = CancelToken::new();

        b.iter(|| {
            let order = orders
                .create_order(
                    &cancel,
                    CreateOrderInput {
                        customer_id: CustomerId::new(),
                        address: bench_address(),
                        items: vec![pizza_line()],
                    },
                )
                .unwrap();
            payments
                .initiate_payment(&cancel, order.id(), PaymentMethod::Online)
                .unwrap();
            payments
                .confirm_payment(&cancel, order.id(), "tx-bench".to_string())
                .unwrap();
            black_box(order.id());
        });
    });

    // Benchmark: the full flow from checkout to handover
    group.bench_function("order_to_delivered", |b| {
        let stores = setup_stores();
        let orders = OrderService::new(stores.orders.clone());
        let payments = PaymentService::new(stores.payments.clone(), stores.orders.clone());
        let kitchen = KitchenService::new(stores.tickets.clone(), stores.orders.clone());
        let deliveries = DeliveryService::new(
            stores.deliveries.clone(),
            stores.couriers.clone(),
            stores.orders.clone(),
        );
        let cancel = CancelToken::new();

        // One courier shuttles every benchmark order; completing a trip
        // frees them for the next iteration.
        let courier = deliveries
            .register_courier(&cancel, "Ana".to_string(), "+351900000001".to_string())
            .unwrap();
        deliveries.courier_go_online(&cancel, courier.id()).unwrap();
        let courier_id = courier.id();

        b.iter(|| {
            let order = orders
                .create_order(
                    &cancel,
                    CreateOrderInput {
                        customer_id: CustomerId::new(),
                        address: bench_address(),
                        items: vec![pizza_line()],
                    },
                )
                .unwrap();
            let order_id = order.id();

            payments
                .initiate_payment(&cancel, order_id, PaymentMethod::Online)
                .unwrap();
            payments
                .confirm_payment(&cancel, order_id, "tx-bench".to_string())
                .unwrap();

            let ticket = kitchen.accept_order(&cancel, order_id).unwrap();
            kitchen.start_cooking(&cancel, ticket.id()).unwrap();
            kitchen.mark_ready(&cancel, ticket.id()).unwrap();

            deliveries
                .assign_courier(&cancel, order_id, courier_id)
                .unwrap();
            deliveries.pickup(&cancel, order_id).unwrap();
            deliveries.complete_delivery(&cancel, order_id).unwrap();

            black_box(order_id);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_order_pricing, bench_saga_dispatch);
criterion_main!(benches);
