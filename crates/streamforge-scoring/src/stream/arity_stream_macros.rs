//! Macro generating the operations shared by the Uni/Bi/Tri/Quad streams.
//!
//! Operations whose result arity depends on the input arity (`join`,
//! `flatten_last`) and doctests live in the individual stream files.

/// Generates the struct, `Clone`/`Debug` impls and the common methods of an
/// arity stream.
///
/// `$T: $idx` lists the element type parameters with their tuple positions.
/// `$shape` is what collectors see: the element type itself for a uni stream
/// and a Rust tuple otherwise. Joiners always see a Rust tuple, `(A,)` for a
/// uni left side, so a uni joiner cannot be handed to a wider stream.
macro_rules! impl_arity_stream {
    ($stream:ident, $view:ident, $shape:ty, [$($T:ident : $idx:tt),+]) => {
        pub struct $stream<$($T,)+ Sc: streamforge_core::Score> {
            pub(crate) factory: $crate::stream::ConstraintFactory<Sc>,
            pub(crate) stream: $crate::network::StreamId,
            _phantom: std::marker::PhantomData<fn() -> ($($T,)+)>,
        }

        impl<$($T,)+ Sc: streamforge_core::Score> Clone for $stream<$($T,)+ Sc> {
            fn clone(&self) -> Self {
                Self {
                    factory: self.factory.clone(),
                    stream: self.stream,
                    _phantom: std::marker::PhantomData,
                }
            }
        }

        impl<$($T,)+ Sc: streamforge_core::Score> std::fmt::Debug for $stream<$($T,)+ Sc> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($stream))
                    .field("stream", &self.stream)
                    .finish()
            }
        }

        impl<$($T,)+ Sc> $stream<$($T,)+ Sc>
        where
            $($T: $crate::stream::StreamElement,)+
            Sc: streamforge_core::Score,
        {
            pub(crate) fn from_parts(
                factory: $crate::stream::ConstraintFactory<Sc>,
                stream: $crate::network::StreamId,
            ) -> Self {
                Self {
                    factory,
                    stream,
                    _phantom: std::marker::PhantomData,
                }
            }

            fn chain(
                &self,
                node: impl $crate::network::Node + 'static,
            ) -> $crate::network::StreamId {
                self.factory
                    .add_node(node, &[(self.stream, $crate::network::Side::Left)])
            }

            /// Keeps the tuples for which `predicate` holds.
            pub fn filter<P>(self, predicate: P) -> Self
            where
                P: Fn($(&$T),+) -> bool + Send + Sync + 'static,
            {
                let node = $crate::network::node::FilterNode::new(Box::new(
                    move |t: &$crate::network::Tuple| predicate($(t.get::<$T>($idx)),+),
                ));
                let stream = self.chain(node);
                Self::from_parts(self.factory, stream)
            }

            /// Keeps the tuples matched by at least one fact of `other`.
            pub fn if_exists<O, K>(
                self,
                other: $crate::stream::UniConstraintStream<O, Sc>,
                joiner: $crate::stream::joiner::Joiner<($($T,)+), O, K>,
            ) -> Self
            where
                O: $crate::stream::StreamElement,
                K: $crate::stream::JoinKey,
            {
                self.gate(true, other, joiner)
            }

            /// Keeps the tuples matched by no fact of `other`.
            pub fn if_not_exists<O, K>(
                self,
                other: $crate::stream::UniConstraintStream<O, Sc>,
                joiner: $crate::stream::joiner::Joiner<($($T,)+), O, K>,
            ) -> Self
            where
                O: $crate::stream::StreamElement,
                K: $crate::stream::JoinKey,
            {
                self.gate(false, other, joiner)
            }

            fn gate<O, K>(
                self,
                should_exist: bool,
                other: $crate::stream::UniConstraintStream<O, Sc>,
                joiner: $crate::stream::joiner::Joiner<($($T,)+), O, K>,
            ) -> Self
            where
                O: $crate::stream::StreamElement,
                K: $crate::stream::JoinKey,
            {
                let node = $crate::network::node::IfExistsNode::new(
                    should_exist,
                    joiner.left_key,
                    joiner.right_key,
                    joiner.filter,
                );
                let stream = self.factory.add_node(
                    node,
                    &[
                        (self.stream, $crate::network::Side::Left),
                        (other.stream, $crate::network::Side::Right),
                    ],
                );
                Self::from_parts(self.factory, stream)
            }

            /// Maps every tuple to a single value.
            pub fn map<O, F>(self, mapping: F) -> $crate::stream::UniConstraintStream<O, Sc>
            where
                O: $crate::stream::StreamElement,
                F: Fn($(&$T),+) -> O + Send + Sync + 'static,
            {
                let node = $crate::network::node::MapNode::new(Box::new(
                    move |t: &$crate::network::Tuple| {
                        smallvec::smallvec![$crate::stream::fact(mapping($(t.get::<$T>($idx)),+))]
                    },
                ));
                let stream = self.chain(node);
                $crate::stream::UniConstraintStream::from_parts(self.factory, stream)
            }

            /// Collapses tuples with equal elements into one.
            pub fn distinct(self) -> Self
            where
                $($T: $crate::stream::JoinKey,)+
            {
                let node = $crate::network::node::DistinctNode::new(Box::new(
                    |t: &$crate::network::Tuple| ($(t.get::<$T>($idx).clone(),)+),
                ));
                let stream = self.chain(node);
                Self::from_parts(self.factory, stream)
            }

            fn group<K, Col>(
                &self,
                key: $crate::network::TupleMapping<K>,
                collector: Col,
                emit: $crate::network::node::GroupEmitter<K, Col::Result>,
            ) -> $crate::network::StreamId
            where
                K: $crate::stream::JoinKey,
                Col: $crate::stream::collector::Collector<$shape>,
            {
                let node = $crate::network::node::GroupByNode::<
                    $crate::network::$view<$($T),+>,
                    K,
                    Col,
                >::new(key, collector, emit);
                self.chain(node)
            }

            /// Groups by `key`; the result holds one tuple per distinct key.
            pub fn group_by_key<K, F>(self, key: F) -> $crate::stream::UniConstraintStream<K, Sc>
            where
                K: $crate::stream::JoinKey + $crate::stream::StreamElement,
                F: Fn($(&$T),+) -> K + Send + Sync + 'static,
            {
                let stream = self.group(
                    Box::new(move |t: &$crate::network::Tuple| key($(t.get::<$T>($idx)),+)),
                    $crate::stream::collector::Presence,
                    Box::new(|k: &K, _: &()| smallvec::smallvec![$crate::stream::fact(k.clone())]),
                );
                $crate::stream::UniConstraintStream::from_parts(self.factory, stream)
            }

            /// Groups by two keys; the result holds one tuple per distinct
            /// key pair.
            pub fn group_by_keys<K1, K2, F1, F2>(
                self,
                first: F1,
                second: F2,
            ) -> $crate::stream::BiConstraintStream<K1, K2, Sc>
            where
                K1: $crate::stream::JoinKey + $crate::stream::StreamElement,
                K2: $crate::stream::JoinKey + $crate::stream::StreamElement,
                F1: Fn($(&$T),+) -> K1 + Send + Sync + 'static,
                F2: Fn($(&$T),+) -> K2 + Send + Sync + 'static,
            {
                let stream = self.group(
                    Box::new(move |t: &$crate::network::Tuple| {
                        (first($(t.get::<$T>($idx)),+), second($(t.get::<$T>($idx)),+))
                    }),
                    $crate::stream::collector::Presence,
                    Box::new(|k: &(K1, K2), _: &()| {
                        smallvec::smallvec![
                            $crate::stream::fact(k.0.clone()),
                            $crate::stream::fact(k.1.clone())
                        ]
                    }),
                );
                $crate::stream::BiConstraintStream::from_parts(self.factory, stream)
            }

            /// Aggregates the whole stream into one result tuple, present
            /// while the stream is non-empty.
            pub fn collect<Col>(
                self,
                collector: Col,
            ) -> $crate::stream::UniConstraintStream<Col::Result, Sc>
            where
                Col: $crate::stream::collector::Collector<$shape>,
            {
                let stream = self.group(
                    Box::new(|_: &$crate::network::Tuple| ()),
                    collector,
                    Box::new(|_: &(), r: &Col::Result| {
                        smallvec::smallvec![$crate::stream::fact(r.clone())]
                    }),
                );
                $crate::stream::UniConstraintStream::from_parts(self.factory, stream)
            }

            /// Aggregates the whole stream with two collectors.
            pub fn collect_pair<Col1, Col2>(
                self,
                first: Col1,
                second: Col2,
            ) -> $crate::stream::BiConstraintStream<Col1::Result, Col2::Result, Sc>
            where
                Col1: $crate::stream::collector::Collector<$shape>,
                Col2: $crate::stream::collector::Collector<$shape>,
            {
                let stream = self.group(
                    Box::new(|_: &$crate::network::Tuple| ()),
                    (first, second),
                    Box::new(|_: &(), r: &(Col1::Result, Col2::Result)| {
                        smallvec::smallvec![
                            $crate::stream::fact(r.0.clone()),
                            $crate::stream::fact(r.1.clone())
                        ]
                    }),
                );
                $crate::stream::BiConstraintStream::from_parts(self.factory, stream)
            }

            /// Groups by `key` and aggregates each group with `collector`.
            pub fn group_by<K, F, Col>(
                self,
                key: F,
                collector: Col,
            ) -> $crate::stream::BiConstraintStream<K, Col::Result, Sc>
            where
                K: $crate::stream::JoinKey + $crate::stream::StreamElement,
                F: Fn($(&$T),+) -> K + Send + Sync + 'static,
                Col: $crate::stream::collector::Collector<$shape>,
            {
                let stream = self.group(
                    Box::new(move |t: &$crate::network::Tuple| key($(t.get::<$T>($idx)),+)),
                    collector,
                    Box::new(|k: &K, r: &Col::Result| {
                        smallvec::smallvec![
                            $crate::stream::fact(k.clone()),
                            $crate::stream::fact(r.clone())
                        ]
                    }),
                );
                $crate::stream::BiConstraintStream::from_parts(self.factory, stream)
            }

            /// Groups by `key` and aggregates each group with two collectors.
            pub fn group_by_pair<K, F, Col1, Col2>(
                self,
                key: F,
                first: Col1,
                second: Col2,
            ) -> $crate::stream::TriConstraintStream<K, Col1::Result, Col2::Result, Sc>
            where
                K: $crate::stream::JoinKey + $crate::stream::StreamElement,
                F: Fn($(&$T),+) -> K + Send + Sync + 'static,
                Col1: $crate::stream::collector::Collector<$shape>,
                Col2: $crate::stream::collector::Collector<$shape>,
            {
                let stream = self.group(
                    Box::new(move |t: &$crate::network::Tuple| key($(t.get::<$T>($idx)),+)),
                    (first, second),
                    Box::new(|k: &K, r: &(Col1::Result, Col2::Result)| {
                        smallvec::smallvec![
                            $crate::stream::fact(k.clone()),
                            $crate::stream::fact(r.0.clone()),
                            $crate::stream::fact(r.1.clone())
                        ]
                    }),
                );
                $crate::stream::TriConstraintStream::from_parts(self.factory, stream)
            }

            /// Groups by two keys and aggregates each group with `collector`.
            pub fn group_by_keys_collect<K1, K2, F1, F2, Col>(
                self,
                first: F1,
                second: F2,
                collector: Col,
            ) -> $crate::stream::TriConstraintStream<K1, K2, Col::Result, Sc>
            where
                K1: $crate::stream::JoinKey + $crate::stream::StreamElement,
                K2: $crate::stream::JoinKey + $crate::stream::StreamElement,
                F1: Fn($(&$T),+) -> K1 + Send + Sync + 'static,
                F2: Fn($(&$T),+) -> K2 + Send + Sync + 'static,
                Col: $crate::stream::collector::Collector<$shape>,
            {
                let stream = self.group(
                    Box::new(move |t: &$crate::network::Tuple| {
                        (first($(t.get::<$T>($idx)),+), second($(t.get::<$T>($idx)),+))
                    }),
                    collector,
                    Box::new(|k: &(K1, K2), r: &Col::Result| {
                        smallvec::smallvec![
                            $crate::stream::fact(k.0.clone()),
                            $crate::stream::fact(k.1.clone()),
                            $crate::stream::fact(r.clone())
                        ]
                    }),
                );
                $crate::stream::TriConstraintStream::from_parts(self.factory, stream)
            }

            /// Subtracts `weight` per match.
            pub fn penalize(self, weight: Sc) -> $crate::stream::ConstraintBuilder<Sc> {
                self.impact_as(streamforge_core::ImpactType::Penalty, weight, None)
            }

            /// Subtracts `weight * match_weight(..)` per match. A negative
            /// match weight is a score calculation error.
            pub fn penalize_with<W>(
                self,
                weight: Sc,
                match_weight: W,
            ) -> $crate::stream::ConstraintBuilder<Sc>
            where
                W: Fn($(&$T),+) -> i64 + Send + Sync + 'static,
            {
                let match_weight: $crate::network::MatchWeight = Box::new(
                    move |t: &$crate::network::Tuple| match_weight($(t.get::<$T>($idx)),+),
                );
                self.impact_as(streamforge_core::ImpactType::Penalty, weight, Some(match_weight))
            }

            /// Adds `weight` per match.
            pub fn reward(self, weight: Sc) -> $crate::stream::ConstraintBuilder<Sc> {
                self.impact_as(streamforge_core::ImpactType::Reward, weight, None)
            }

            /// Adds `weight * match_weight(..)` per match. A negative match
            /// weight is a score calculation error.
            pub fn reward_with<W>(
                self,
                weight: Sc,
                match_weight: W,
            ) -> $crate::stream::ConstraintBuilder<Sc>
            where
                W: Fn($(&$T),+) -> i64 + Send + Sync + 'static,
            {
                let match_weight: $crate::network::MatchWeight = Box::new(
                    move |t: &$crate::network::Tuple| match_weight($(t.get::<$T>($idx)),+),
                );
                self.impact_as(streamforge_core::ImpactType::Reward, weight, Some(match_weight))
            }

            /// Adds `weight` per match as is; use a negative weight to
            /// penalize.
            pub fn impact(self, weight: Sc) -> $crate::stream::ConstraintBuilder<Sc> {
                self.impact_as(streamforge_core::ImpactType::Mixed, weight, None)
            }

            /// Adds `weight * match_weight(..)` per match, whatever its sign.
            pub fn impact_with<W>(
                self,
                weight: Sc,
                match_weight: W,
            ) -> $crate::stream::ConstraintBuilder<Sc>
            where
                W: Fn($(&$T),+) -> i64 + Send + Sync + 'static,
            {
                let match_weight: $crate::network::MatchWeight = Box::new(
                    move |t: &$crate::network::Tuple| match_weight($(t.get::<$T>($idx)),+),
                );
                self.impact_as(streamforge_core::ImpactType::Mixed, weight, Some(match_weight))
            }

            fn impact_as(
                self,
                impact_type: streamforge_core::ImpactType,
                weight: Sc,
                match_weight: Option<$crate::network::MatchWeight>,
            ) -> $crate::stream::ConstraintBuilder<Sc> {
                let justify: $crate::network::Justifier =
                    Box::new(|t: &$crate::network::Tuple| {
                        vec![$($crate::api::EntityRef::new(t.get::<$T>($idx))),+]
                    });
                $crate::stream::ConstraintBuilder::new(
                    self.stream,
                    impact_type,
                    weight,
                    match_weight,
                    justify,
                )
            }
        }
    };
}
